//! Field path parsing for prototype overrides
//!
//! Path expressions like `address.suite` or `team[0].name` are parsed into a
//! sequence of [`PathSegment`]s used to walk a freshly cloned graph.
//!
//! Supported syntax:
//! - Dot notation: `address.suite`
//! - Array indices: `team[0]`, `team[1].name`
//! - Quoted keys: `labels["with.dot"]` or `labels['with.dot']`
//! - Escaped dots: `with\.dot`
//!
//! A path must name at least one field. Empty segments (`a..b`, `a.`),
//! empty brackets and an unclosed `[` are rejected.

use std::fmt;

use crate::error::{Error, Result};

/// One step of a field path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A named field of a composite
    Key(String),
    /// A position within a list
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "field '{}'", key),
            PathSegment::Index(idx) => write!(f, "index {}", idx),
        }
    }
}

/// Parse a field path into segments.
///
/// # Errors
///
/// Returns `Error::UnknownOverrideField` if the path names no field or is
/// malformed.
///
/// # Examples
///
/// ```
/// use proto_forge::path::{parse_path, PathSegment};
///
/// let segments = parse_path("address.suite").unwrap();
/// assert_eq!(
///     segments,
///     vec![
///         PathSegment::Key("address".to_string()),
///         PathSegment::Key("suite".to_string()),
///     ]
/// );
/// assert!(parse_path("address..suite").is_err());
/// ```
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>> {
    let invalid = |message: &str| Error::UnknownOverrideField {
        path: path.to_string(),
        message: message.to_string(),
    };

    let mut segments = Vec::new();
    let mut key = String::new();
    // A '.' right after ']' separates segments without closing a key.
    let mut after_bracket = false;
    let mut chars = path.trim().chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                key.extend(chars.next());
                after_bracket = false;
            }
            '.' => {
                if key.is_empty() && !after_bracket {
                    return Err(invalid("empty path segment"));
                }
                flush_key(&mut key, &mut segments);
                after_bracket = false;
            }
            '[' => {
                flush_key(&mut key, &mut segments);
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    return Err(invalid("unclosed '['"));
                }

                let inner = inner.trim();
                let quoted = inner.len() >= 2
                    && (inner.starts_with('"') && inner.ends_with('"')
                        || inner.starts_with('\'') && inner.ends_with('\''));

                if quoted {
                    segments.push(PathSegment::Key(inner[1..inner.len() - 1].to_string()));
                } else if let Ok(idx) = inner.parse::<usize>() {
                    segments.push(PathSegment::Index(idx));
                } else if inner.is_empty() {
                    return Err(invalid("empty brackets"));
                } else {
                    segments.push(PathSegment::Key(inner.to_string()));
                }
                after_bracket = true;
            }
            _ => {
                key.push(ch);
                after_bracket = false;
            }
        }
    }

    if key.is_empty() && !after_bracket {
        return Err(invalid(if segments.is_empty() {
            "path names no field"
        } else {
            "empty path segment"
        }));
    }
    flush_key(&mut key, &mut segments);

    Ok(segments)
}

fn flush_key(key: &mut String, segments: &mut Vec<PathSegment>) {
    if !key.is_empty() {
        segments.push(PathSegment::Key(std::mem::take(key)));
    }
}
