//! Property-based tests for the cloner.
//!
//! These tests use proptest to generate random object graphs and verify that
//! cloning invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::fmt;

    use proptest::prelude::*;

    use crate::cloner::Cloner;
    use crate::composite::{convert_field, unknown_field, Composite};
    use crate::error::Result;
    use crate::registry::TypeRegistry;
    use crate::value::{Object, Value};

    /// Tree-shaped composite used to build arbitrary graphs
    #[derive(Default)]
    struct Node {
        label: Option<String>,
        weight: Option<i64>,
        children: Vec<Value>,
    }

    impl fmt::Display for Node {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "{}{}",
                Value::from(self.label.clone()),
                Value::List(self.children.clone())
            )
        }
    }

    impl Composite for Node {
        fn type_name(&self) -> &'static str {
            "Node"
        }

        fn field_names(&self) -> &'static [&'static str] {
            &["label", "weight", "children"]
        }

        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "label" => Some(self.label.clone().into()),
                "weight" => Some(self.weight.into()),
                "children" => Some(Value::List(self.children.clone())),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "label" => self.label = convert_field(self.type_name(), name, value)?,
                "weight" => self.weight = convert_field(self.type_name(), name, value)?,
                "children" => self.children = convert_field(self.type_name(), name, value)?,
                _ => return Err(unknown_field(self.type_name(), name)),
            }
            Ok(())
        }
    }

    #[derive(Debug, Clone)]
    enum Shape {
        Leaf(Option<String>, Option<i64>),
        Branch(Option<String>, Vec<Shape>),
    }

    fn arb_shape() -> impl Strategy<Value = Shape> {
        let leaf = (
            proptest::option::of("[a-z]{1,8}"),
            proptest::option::of(any::<i64>()),
        )
            .prop_map(|(label, weight)| Shape::Leaf(label, weight));
        leaf.prop_recursive(4, 32, 4, |inner| {
            (
                proptest::option::of("[a-z]{1,8}"),
                proptest::collection::vec(inner, 0..4),
            )
                .prop_map(|(label, children)| Shape::Branch(label, children))
        })
    }

    fn build(shape: &Shape) -> Value {
        let node = match shape {
            Shape::Leaf(label, weight) => Node {
                label: label.clone(),
                weight: *weight,
                children: Vec::new(),
            },
            Shape::Branch(label, children) => Node {
                label: label.clone(),
                weight: None,
                children: children.iter().map(build).collect(),
            },
        };
        Value::Object(Object::new(node))
    }

    fn cloner() -> Cloner {
        Cloner::new(TypeRegistry::builder().register::<Node>().build().unwrap())
    }

    fn flattened(cloner: &Cloner, value: &Value) -> serde_json::Value {
        cloner.flatten(cloner.mark(value).unwrap()).tree().clone()
    }

    fn collect_objects(value: &Value, out: &mut Vec<Object>) {
        match value {
            Value::Object(object) => {
                out.push(object.clone());
                for (_, field) in object.borrow().fields() {
                    collect_objects(&field, out);
                }
            }
            Value::List(items) => items.iter().for_each(|item| collect_objects(item, out)),
            _ => {}
        }
    }

    fn relabel(value: &Value) {
        let mut objects = Vec::new();
        collect_objects(value, &mut objects);
        for object in objects {
            object.set_field("label", "mutated".into()).unwrap();
            object.set_field("weight", Value::from(-1)).unwrap();
        }
    }

    proptest! {
        /// Property: the clone has the same structure, tags and leaves
        #[test]
        fn clone_preserves_structure_and_leaves(shape in arb_shape()) {
            let cloner = cloner();
            let original = build(&shape);
            let copy = cloner.clone(&original).unwrap();
            prop_assert_eq!(flattened(&cloner, &original), flattened(&cloner, &copy));
        }

        /// Property: no registered composite is shared between original and clone
        #[test]
        fn clone_shares_no_registered_objects(shape in arb_shape()) {
            let cloner = cloner();
            let original = build(&shape);
            let copy = cloner.clone(&original).unwrap();

            let mut before = Vec::new();
            let mut after = Vec::new();
            collect_objects(&original, &mut before);
            collect_objects(&copy, &mut after);
            prop_assert_eq!(before.len(), after.len());
            for object in &after {
                prop_assert!(!before.iter().any(|seen| seen.ptr_eq(object)));
            }
        }

        /// Property: mutating every node of the clone leaves the original intact
        #[test]
        fn mutating_clone_leaves_original_untouched(shape in arb_shape()) {
            let cloner = cloner();
            let original = build(&shape);
            let snapshot = flattened(&cloner, &original);

            let copy = cloner.clone(&original).unwrap();
            relabel(&copy);
            prop_assert_eq!(flattened(&cloner, &original), snapshot);
        }

        /// Property: every rebuilt node is a Node again, with its behavior
        #[test]
        fn clone_preserves_rendering(shape in arb_shape()) {
            let cloner = cloner();
            let original = build(&shape);
            let copy = cloner.clone(&original).unwrap();
            prop_assert!(copy.as_object().unwrap().is::<Node>());
            prop_assert_eq!(copy.to_string(), original.to_string());
        }

        /// Property: primitive lists come back equal
        #[test]
        fn clone_primitive_lists(items in proptest::collection::vec(any::<i64>(), 0..16)) {
            let cloner = cloner();
            let list = Value::List(items.into_iter().map(Value::from).collect());
            prop_assert_eq!(cloner.clone(&list).unwrap(), list);
        }
    }
}
