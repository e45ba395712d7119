//! Deep merge of state trees.
//!
//! Mappings merge key by key. Any other overlay value (scalar, sequence or
//! `null`) replaces whatever the base holds at that key. A `null` in the
//! overlay is written as `null`; it never deletes the key.

use crate::tree::StateTree;
use serde_json::Value;

/// Merge `overlay` over a copy of `base`
#[must_use]
pub fn merge(base: &StateTree, overlay: &StateTree) -> StateTree {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

/// Merge `overlay` over `base` in place
pub fn merge_into(base: &mut StateTree, overlay: &StateTree) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_merge_scalars_overwrite() {
        let base = json!({"message": "Hello!", "song": "The Wheel"});
        let merged = merge(&base, &json!({"message": "Yo!"}));
        assert_eq!(merged, json!({"message": "Yo!", "song": "The Wheel"}));
    }

    #[test]
    fn test_merge_null_is_written() {
        let base = json!({"message": "Hello!", "song": "The Wheel"});
        let merged = merge(&base, &json!({"message": "Yo!", "song": null}));
        assert_eq!(merged, json!({"message": "Yo!", "song": null}));
    }

    #[test]
    fn test_merge_nested_objects() {
        let base = json!({"user": {"name": "a", "prefs": {"theme": "dark", "lang": "en"}}});
        let merged = merge(&base, &json!({"user": {"prefs": {"lang": "fr"}}}));
        assert_eq!(
            merged,
            json!({"user": {"name": "a", "prefs": {"theme": "dark", "lang": "fr"}}})
        );
    }

    #[test]
    fn test_merge_arrays_replace() {
        let base = json!({"items": [1, 2, 3]});
        let merged = merge(&base, &json!({"items": [4]}));
        assert_eq!(merged, json!({"items": [4]}));
    }

    #[test]
    fn test_merge_adds_new_keys() {
        let merged = merge(&json!({"a": 1}), &json!({"b": {"c": 2}}));
        assert_eq!(merged, json!({"a": 1, "b": {"c": 2}}));
    }

    #[test]
    fn test_merge_leaves_base_untouched() {
        let base = json!({"a": {"b": 1}});
        let _ = merge(&base, &json!({"a": {"b": 2}}));
        assert_eq!(base, json!({"a": {"b": 1}}));
    }

    fn arb_tree() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                proptest::collection::btree_map("[a-c]{1,2}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_merge_with_self_is_identity(tree in arb_tree()) {
            prop_assert_eq!(merge(&tree, &tree), tree);
        }

        #[test]
        fn prop_merge_empty_object_is_identity(
            map in proptest::collection::btree_map("[a-c]{1,2}", arb_tree(), 0..4)
        ) {
            let tree = Value::Object(map.into_iter().collect());
            prop_assert_eq!(merge(&tree, &json!({})), tree);
        }

        #[test]
        fn prop_merge_is_idempotent(base in arb_tree(), overlay in arb_tree()) {
            let once = merge(&base, &overlay);
            let twice = merge(&once, &overlay);
            prop_assert_eq!(once, twice);
        }
    }
}
