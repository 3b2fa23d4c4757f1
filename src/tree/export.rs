//! JSON export
//!
//! Two shapes: a flat level-ordered array where each node carries a
//! `Parent` id, and a nested form where each node carries its `Children`.
//! Node attributes serialize with the provider's PascalCase names and a
//! `Type` tag; timestamps come out as ISO-8601 strings.

use crate::org::types::OrgNode;
use crate::tree::OrgTree;
use serde_json::Value;

/// Export the tree as a level-ordered array of attribute objects, each with
/// a `Parent` field naming its parent's id (null for roots).
pub fn to_flat_json(tree: &OrgTree) -> Result<String, serde_json::Error> {
    let mut rows = Vec::with_capacity(tree.len());
    for (node, parent) in tree.iter_level_order() {
        let mut row = serde_json::to_value(node)?;
        if let Value::Object(map) = &mut row {
            let parent_id = parent
                .map(|p| Value::String(p.id().to_string()))
                .unwrap_or(Value::Null);
            map.insert("Parent".into(), parent_id);
        }
        rows.push(row);
    }
    serde_json::to_string_pretty(&rows)
}

/// Export the tree as nested objects with `Children` arrays.
///
/// A single root renders as one object; several roots render as an array.
pub fn to_nested_json(tree: &OrgTree) -> Result<String, serde_json::Error> {
    let mut roots = Vec::new();
    for root in tree.roots() {
        roots.push(nested_value(tree, root)?);
    }
    let value = if roots.len() == 1 {
        roots.remove(0)
    } else {
        Value::Array(roots)
    };
    serde_json::to_string_pretty(&value)
}

fn nested_value(tree: &OrgTree, node: &OrgNode) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(node)?;

    let mut children = Vec::new();
    for child in tree.children_of(node.id()) {
        children.push(nested_value(tree, child)?);
    }

    if let Value::Object(map) = &mut value {
        if !children.is_empty() {
            map.insert("Children".into(), Value::Array(children));
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::types::{Account, OrgUnit, Root};
    use chrono::{TimeZone, Utc};

    fn sample_tree() -> OrgTree {
        let mut tree = OrgTree::new();
        tree.insert(Root::new("r-1").into(), None).unwrap();
        tree.insert(OrgUnit::new("ou-1", "One").into(), Some("r-1"))
            .unwrap();
        let mut account = Account::new("a-1", "one");
        account.joined_timestamp = Some(Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap());
        tree.insert(account.into(), Some("ou-1")).unwrap();
        tree
    }

    #[test]
    fn test_flat_export_has_parent_ids() {
        let json = to_flat_json(&sample_tree()).unwrap();
        let rows: Vec<Value> = serde_json::from_str(&json).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["Id"], "r-1");
        assert_eq!(rows[0]["Parent"], Value::Null);
        assert_eq!(rows[1]["Id"], "ou-1");
        assert_eq!(rows[1]["Parent"], "r-1");
        assert_eq!(rows[2]["Parent"], "ou-1");
    }

    #[test]
    fn test_flat_export_timestamps_are_iso8601() {
        let json = to_flat_json(&sample_tree()).unwrap();
        assert!(json.contains("2021-06-01T12:00:00Z"));
    }

    #[test]
    fn test_nested_export_single_root_is_object() {
        let json = to_nested_json(&sample_tree()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["Id"], "r-1");
        assert_eq!(value["Type"], "ROOT");
        let children = value["Children"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["Id"], "ou-1");
        assert_eq!(children[0]["Children"][0]["Id"], "a-1");
    }

    #[test]
    fn test_nested_export_leaves_have_no_children_key() {
        let json = to_nested_json(&sample_tree()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let account = &value["Children"][0]["Children"][0];
        assert!(account.get("Children").is_none());
    }

    #[test]
    fn test_nested_export_multiple_roots_is_array() {
        let mut tree = OrgTree::new();
        tree.insert(Root::new("r-1").into(), None).unwrap();
        tree.insert(Root::new("r-2").into(), None).unwrap();

        let json = to_nested_json(&tree).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }
}
