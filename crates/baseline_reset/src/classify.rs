//! Mutation classification.

use baseline_core::{MutationType, NamespacePath};

/// What a committed mutation asks of the reset extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationClass {
    /// Restore the whole tree (except `route`)
    GlobalReset,
    /// Restore only the sub-tree of the module at this namespace
    NamespacedReset(NamespacePath),
    /// Not a reset trigger
    Ignored,
}

impl MutationClass {
    /// Whether this is one of the reset variants
    #[must_use]
    pub fn is_reset(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Classify a mutation type against the trigger action name.
///
/// Malformed types can never match a trigger and are ignored.
#[must_use]
pub fn classify(kind: &str, trigger: &str) -> MutationClass {
    if kind == trigger {
        return MutationClass::GlobalReset;
    }
    let Ok(parsed) = MutationType::parse(kind) else {
        return MutationClass::Ignored;
    };
    if parsed.action() != trigger {
        return MutationClass::Ignored;
    }
    if parsed.namespace().is_root() {
        MutationClass::GlobalReset
    } else {
        MutationClass::NamespacedReset(parsed.namespace().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ns(s: &str) -> NamespacePath {
        NamespacePath::parse(s).unwrap()
    }

    #[test]
    fn test_global_reset() {
        assert_eq!(classify("reset", "reset"), MutationClass::GlobalReset);
    }

    #[test]
    fn test_namespaced_reset() {
        assert_eq!(
            classify("song/reset", "reset"),
            MutationClass::NamespacedReset(ns("song"))
        );
        assert_eq!(
            classify("a/b/reset", "reset"),
            MutationClass::NamespacedReset(ns("a/b"))
        );
    }

    #[test]
    fn test_ignored() {
        assert_eq!(classify("message", "reset"), MutationClass::Ignored);
        assert_eq!(classify("song/name", "reset"), MutationClass::Ignored);
        assert_eq!(classify("reset/name", "reset"), MutationClass::Ignored);
        assert_eq!(classify("resets", "reset"), MutationClass::Ignored);
        assert!(!classify("message", "reset").is_reset());
    }

    #[test]
    fn test_malformed_types_ignored() {
        assert_eq!(classify("/reset", "reset"), MutationClass::Ignored);
        assert_eq!(classify("a//reset", "reset"), MutationClass::Ignored);
        assert_eq!(classify("", "reset"), MutationClass::Ignored);
    }

    #[test]
    fn test_custom_trigger() {
        assert_eq!(classify("clear", "clear"), MutationClass::GlobalReset);
        assert_eq!(classify("reset", "clear"), MutationClass::Ignored);
        assert_eq!(
            classify("song/clear", "clear"),
            MutationClass::NamespacedReset(ns("song"))
        );
    }

    proptest! {
        #[test]
        fn prop_non_trigger_actions_ignored(
            segments in proptest::collection::vec("[a-z]{1,5}", 0..3),
            action in "[a-z]{1,8}"
        ) {
            prop_assume!(action != "reset");
            let mut parts = segments.clone();
            parts.push(action);
            prop_assert_eq!(classify(&parts.join("/"), "reset"), MutationClass::Ignored);
        }

        #[test]
        fn prop_trigger_keys_full_path(segments in proptest::collection::vec("[a-z]{1,5}", 1..4)) {
            let kind = format!("{}/reset", segments.join("/"));
            let expected = NamespacePath::from_segments(segments).unwrap();
            prop_assert_eq!(classify(&kind, "reset"), MutationClass::NamespacedReset(expected));
        }
    }
}
