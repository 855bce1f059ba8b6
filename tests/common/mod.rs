//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_catalog(catalogs::TEAM);
//!     fixture.command().arg("list").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::catalogs;
    #[allow(unused_imports)]
    pub use super::TestFixture;
}

/// Catalog YAML snippets for testing.
#[allow(dead_code)]
pub mod catalogs {
    /// One prototype per office, with different cities than the built-in one.
    pub const TEAM: &str = r#"
prototypes:
  north:
    $type: Employee
    name: null
    address:
      $type: Address
      suite: null
      street_address: 1 Harbour St
      city: Leeds
  south:
    $type: Employee
    name: Pat
    address:
      $type: Address
      suite: 9
      street_address: 5 Quay Rd
      city: Brighton
"#;

    /// References a composite type nobody registered.
    pub const UNKNOWN_TYPE: &str = r#"
prototypes:
  boss:
    $type: Manager
    name: null
"#;

    /// Sets a field the type does not declare.
    pub const UNKNOWN_FIELD: &str = r#"
prototypes:
  main:
    $type: Address
    floor: 3
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "prototypes: [unclosed";

    /// No prototypes at all.
    pub const EMPTY: &str = "prototypes: {}\n";
}

/// A temporary directory holding an optional catalog file.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `catalog.yaml` with the given content.
    pub fn with_catalog(self, content: &str) -> Self {
        self.temp_dir
            .child("catalog.yaml")
            .write_str(content)
            .expect("Failed to write catalog file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.temp_dir.path().join("catalog.yaml")
    }

    /// A command running in the fixture directory with no inherited catalog.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("proto-forge");
        cmd.current_dir(self.path())
            .env_remove("PROTO_FORGE_CATALOG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Like [`TestFixture::command`], pointed at the fixture's catalog.
    #[allow(dead_code)]
    pub fn command_with_catalog(&self, subcommand: &str) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg(subcommand).arg("--catalog").arg(self.catalog_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
