//! State trees and structural copies.
//!
//! A state tree is a `serde_json::Value` whose root is normally an object.
//! Every function here that returns a tree returns an owned copy, so nothing
//! handed out shares substructure with its source.

use crate::error::{CoreError, CoreResult};
use crate::mutation_type::NamespacePath;
use serde::Serialize;
use serde_json::{Map, Value};

/// A state tree (or any sub-tree of one)
pub type StateTree = Value;

/// Deepest nesting accepted by `deep_clone_checked` and `to_state_tree`
pub const MAX_TREE_DEPTH: usize = 128;

/// Structural copy of a tree.
///
/// Mappings, sequences and scalars are copied recursively. `Value` owns all
/// of its children, so the result never aliases `tree`.
#[must_use]
pub fn deep_clone(tree: &StateTree) -> StateTree {
    tree.clone()
}

/// Structural copy that refuses trees nested deeper than `MAX_TREE_DEPTH`.
///
/// # Errors
///
/// Returns `TooDeep` without producing a partial copy
pub fn deep_clone_checked(tree: &StateTree) -> CoreResult<StateTree> {
    check_depth(tree)?;
    Ok(deep_clone(tree))
}

/// Copy typed host state into a state tree.
///
/// # Errors
///
/// Returns `Clone` if `value` cannot be represented (e.g. non-string map
/// keys or a failing `Serialize` impl), `TooDeep` if it nests too deeply
pub fn to_state_tree<T: Serialize + ?Sized>(value: &T) -> CoreResult<StateTree> {
    let tree = serde_json::to_value(value)?;
    check_depth(&tree)?;
    Ok(tree)
}

/// Nesting depth of a tree; scalars have depth 0
#[must_use]
pub fn depth(tree: &StateTree) -> usize {
    let mut max = 0;
    let mut stack = vec![(tree, 0usize)];
    while let Some((value, level)) = stack.pop() {
        match value {
            Value::Object(map) => {
                max = max.max(level + 1);
                stack.extend(map.values().map(|v| (v, level + 1)));
            }
            Value::Array(items) => {
                max = max.max(level + 1);
                stack.extend(items.iter().map(|v| (v, level + 1)));
            }
            _ => {}
        }
    }
    max
}

fn check_depth(tree: &StateTree) -> CoreResult<()> {
    let depth = depth(tree);
    if depth > MAX_TREE_DEPTH {
        return Err(CoreError::TooDeep {
            depth,
            max: MAX_TREE_DEPTH,
        });
    }
    Ok(())
}

/// Sub-tree at `path`; the root path returns `tree` itself
#[must_use]
pub fn get_path<'a>(tree: &'a StateTree, path: &NamespacePath) -> Option<&'a StateTree> {
    path.segments()
        .iter()
        .try_fold(tree, |node, segment| node.as_object()?.get(segment))
}

/// Mutable sub-tree at `path`
pub fn get_path_mut<'a>(tree: &'a mut StateTree, path: &NamespacePath) -> Option<&'a mut StateTree> {
    path.segments()
        .iter()
        .try_fold(tree, |node, segment| node.as_object_mut()?.get_mut(segment))
}

/// Write `value` at `path`, creating missing intermediate mappings.
///
/// Writing at the root path replaces the whole tree.
///
/// # Errors
///
/// Returns `NotAMapping` if an existing intermediate value is not a mapping
pub fn set_path(tree: &mut StateTree, path: &NamespacePath, value: StateTree) -> CoreResult<()> {
    let Some((last, parents)) = path.segments().split_last() else {
        *tree = value;
        return Ok(());
    };

    let mut node = tree;
    let mut walked = Vec::with_capacity(parents.len());
    for segment in parents {
        walked.push(segment.as_str());
        node = as_map_mut(node, &walked)?
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    as_map_mut(node, &walked)?.insert(last.clone(), value);
    Ok(())
}

/// Remove and return the sub-tree at `path`.
///
/// The root path cannot be removed and yields `None`.
pub fn remove_path(tree: &mut StateTree, path: &NamespacePath) -> Option<StateTree> {
    let name = path.name()?;
    let parent = path.parent()?;
    get_path_mut(tree, &parent)?.as_object_mut()?.remove(name)
}

fn as_map_mut<'a>(node: &'a mut Value, walked: &[&str]) -> CoreResult<&'a mut Map<String, Value>> {
    node.as_object_mut().ok_or_else(|| CoreError::NotAMapping {
        path: walked.join("/"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn ns(s: &str) -> NamespacePath {
        NamespacePath::parse(s).unwrap()
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let original = json!({"song": {"collections": ["Summer"], "map": {"Summer": 1}}});
        let mut copy = deep_clone(&original);
        copy["song"]["collections"].as_array_mut().unwrap().push(json!("Dance"));
        copy["song"]["map"]["Dance"] = json!(1);

        assert_eq!(original["song"]["collections"], json!(["Summer"]));
        assert_eq!(original["song"]["map"], json!({"Summer": 1}));
    }

    #[test]
    fn test_depth() {
        assert_eq!(depth(&json!(1)), 0);
        assert_eq!(depth(&json!({})), 1);
        assert_eq!(depth(&json!({"a": [1, {"b": 2}]})), 3);
    }

    #[test]
    fn test_deep_clone_checked_rejects_deep_tree() {
        let mut tree = json!(null);
        for _ in 0..=MAX_TREE_DEPTH {
            tree = json!([tree]);
        }
        let err = deep_clone_checked(&tree).unwrap_err();
        assert!(matches!(err, CoreError::TooDeep { .. }));
    }

    #[test]
    fn test_to_state_tree_typed() {
        #[derive(Serialize)]
        struct Song {
            name: String,
            collections: Vec<String>,
        }
        let tree = to_state_tree(&Song {
            name: "Messy Love".to_string(),
            collections: vec![],
        })
        .unwrap();
        assert_eq!(tree, json!({"name": "Messy Love", "collections": []}));
    }

    #[test]
    fn test_to_state_tree_rejects_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "pair");
        let err = to_state_tree(&map).unwrap_err();
        assert!(matches!(err, CoreError::Clone { .. }));
    }

    #[test]
    fn test_get_path() {
        let tree = json!({"a": {"b": {"c": 1}}, "x": 2});
        assert_eq!(get_path(&tree, &NamespacePath::root()), Some(&tree));
        assert_eq!(get_path(&tree, &ns("a/b")), Some(&json!({"c": 1})));
        assert_eq!(get_path(&tree, &ns("x")), Some(&json!(2)));
        assert_eq!(get_path(&tree, &ns("x/y")), None);
        assert_eq!(get_path(&tree, &ns("missing")), None);
    }

    #[test]
    fn test_get_path_mut() {
        let mut tree = json!({"a": {"b": 1}});
        *get_path_mut(&mut tree, &ns("a/b")).unwrap() = json!(2);
        assert_eq!(tree, json!({"a": {"b": 2}}));
        assert!(get_path_mut(&mut tree, &ns("a/b/c")).is_none());
    }

    #[test]
    fn test_set_path_creates_intermediates() {
        let mut tree = json!({});
        set_path(&mut tree, &ns("a/b"), json!({"c": 1})).unwrap();
        assert_eq!(tree, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_set_path_root_replaces() {
        let mut tree = json!({"a": 1});
        set_path(&mut tree, &NamespacePath::root(), json!({"b": 2})).unwrap();
        assert_eq!(tree, json!({"b": 2}));
    }

    #[test]
    fn test_set_path_through_scalar_fails() {
        let mut tree = json!({"a": 1});
        let err = set_path(&mut tree, &ns("a/b"), json!(2)).unwrap_err();
        assert_eq!(err, CoreError::NotAMapping { path: "a".to_string() });
        assert_eq!(tree, json!({"a": 1}));
    }

    #[test]
    fn test_remove_path() {
        let mut tree = json!({"a": {"b": 1, "c": 2}});
        assert_eq!(remove_path(&mut tree, &ns("a/b")), Some(json!(1)));
        assert_eq!(tree, json!({"a": {"c": 2}}));
        assert_eq!(remove_path(&mut tree, &ns("a/b")), None);
        assert_eq!(remove_path(&mut tree, &NamespacePath::root()), None);
    }

    proptest! {
        #[test]
        fn prop_set_then_get(segments in proptest::collection::vec("[a-z]{1,4}", 1..4), leaf: i64) {
            let path = NamespacePath::from_segments(segments).unwrap();
            let mut tree = json!({});
            set_path(&mut tree, &path, json!(leaf)).unwrap();
            prop_assert_eq!(get_path(&tree, &path), Some(&json!(leaf)));
        }
    }
}
