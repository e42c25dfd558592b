use serde_json::Value;
use sylva::ast::{Node, TraverseOptions, Traverser, VisitAction};

/// Assert that every node reachable from `root` serializes to exactly its
/// declared property names, in order
pub fn assert_registry_shapes(root: &dyn Node) {
    let mut checked = 0;
    Traverser::new(TraverseOptions::default())
        .add_function(|item, _| {
            if let Some(node) = item.as_node() {
                let Value::Object(record) = node.serialize() else {
                    panic!("{} did not serialize to a record", node.kind());
                };
                let keys: Vec<&str> = record.keys().map(String::as_str).collect();
                assert_eq!(keys, node.property_names(), "key order for {}", node.kind());
                checked += 1;
            }
            VisitAction::Continue
        })
        .traverse(root);
    assert!(checked > 0, "Expected at least one node");
}

/// Assert that rendered text matches, showing both sides on failure
pub fn assert_renders(actual: &str, expected: &str) {
    assert_eq!(
        actual, expected,
        "\n--- rendered ---\n{}\n--- expected ---\n{}\n",
        actual, expected
    );
}
