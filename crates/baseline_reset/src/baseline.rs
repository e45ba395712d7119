//! Baseline capture and synchronization.
//!
//! The baseline is an owned copy of the state tree taken at install time.
//! Only `add_namespace` and `remove_namespace` change it afterwards, and
//! every read hands out a fresh copy.

use crate::error::{ResetError, ResetResult};
use baseline_core::{
    NamespacePath, StateTree, deep_clone, deep_clone_checked, get_path, merge, remove_path,
    set_path,
};
use baseline_store::HostStore;
use serde_json::{Map, Value};

/// Restore target for resets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    tree: StateTree,
}

impl Baseline {
    /// Capture a copy of `initial`.
    ///
    /// Must run before hydration so hydration data never becomes part of
    /// the baseline.
    ///
    /// # Errors
    ///
    /// Returns `RootNotMapping` if `initial` is not a mapping, or a clone error
    pub fn capture(initial: &StateTree) -> ResetResult<Self> {
        if !initial.is_object() {
            return Err(ResetError::RootNotMapping);
        }
        let tree = deep_clone_checked(initial)?;
        tracing::debug!(namespaces = tree.as_object().map_or(0, Map::len), "baseline captured");
        Ok(Self { tree })
    }

    /// Store a copy of `state` as the baseline entry for `namespace`
    ///
    /// # Errors
    ///
    /// Returns error for the root namespace, a clone failure, or when an
    /// ancestor entry is not a mapping
    pub fn add_namespace(&mut self, namespace: &NamespacePath, state: &StateTree) -> ResetResult<()> {
        if namespace.is_root() {
            return Err(ResetError::RootNamespace {
                operation: "added".to_string(),
            });
        }
        let entry = deep_clone_checked(state)?;
        set_path(&mut self.tree, namespace, entry)?;
        tracing::debug!(%namespace, "baseline namespace added");
        Ok(())
    }

    /// Drop the baseline entry for `namespace`; returns whether it existed
    pub fn remove_namespace(&mut self, namespace: &NamespacePath) -> bool {
        let removed = remove_path(&mut self.tree, namespace).is_some();
        tracing::debug!(%namespace, removed, "baseline namespace removed");
        removed
    }

    /// Copy of the whole baseline
    #[must_use]
    pub fn snapshot_root(&self) -> StateTree {
        deep_clone(&self.tree)
    }

    /// Copy of the entry for `namespace`, `None` if it was never captured
    /// (or has been removed)
    #[must_use]
    pub fn snapshot_namespace(&self, namespace: &NamespacePath) -> Option<StateTree> {
        get_path(&self.tree, namespace).map(deep_clone)
    }
}

/// Merge `data` over a copy of the store's live state and replace it.
///
/// The baseline is not involved: a later reset goes back past the
/// hydration data.
///
/// # Errors
///
/// Returns a clone error if the merged tree cannot be copied
pub fn hydrate<S: HostStore + ?Sized>(store: &mut S, data: &Map<String, Value>) -> ResetResult<()> {
    let current = deep_clone_checked(store.state())?;
    let hydrated = merge(&current, &Value::Object(data.clone()));
    store.replace_state(hydrated);
    tracing::info!(keys = data.len(), "state hydrated");
    Ok(())
}
