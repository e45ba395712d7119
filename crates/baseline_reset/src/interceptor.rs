//! Mutation interceptor.
//!
//! Turns a classified mutation into at most one whole-tree replacement.
//! The live tree is never edited in place.

use crate::baseline::Baseline;
use crate::classify::{MutationClass, classify};
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::error::{ResetError, ResetResult};
use baseline_core::{NamespacePath, StateTree, deep_clone, set_path};
use baseline_store::{HostStore, Mutation};
use std::cell::RefCell;
use std::rc::Rc;

/// Namespace kept at its current value by a global reset
pub const ROUTE_NAMESPACE: &str = "route";

/// What the interceptor will do for one mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Replace the live tree with this one
    Replace(StateTree),
    /// Namespaced reset for a namespace the baseline does not know; no-op
    UnknownNamespace(NamespacePath),
    /// Nothing to do
    Skip,
}

/// Compute the replacement tree for a classified mutation.
///
/// # Errors
///
/// Returns `NotAMapping` if the live tree cannot hold the namespace entry
pub fn plan(class: &MutationClass, current: &StateTree, baseline: &Baseline) -> ResetResult<Plan> {
    match class {
        MutationClass::Ignored => Ok(Plan::Skip),
        MutationClass::GlobalReset => {
            let mut next = baseline.snapshot_root();
            let route = current.get(ROUTE_NAMESPACE).filter(|route| !route.is_null());
            if let (Some(route), Some(map)) = (route, next.as_object_mut()) {
                map.insert(ROUTE_NAMESPACE.to_string(), deep_clone(route));
            }
            Ok(Plan::Replace(next))
        }
        MutationClass::NamespacedReset(namespace) => {
            let Some(entry) = baseline.snapshot_namespace(namespace) else {
                return Ok(Plan::UnknownNamespace(namespace.clone()));
            };
            let mut next = deep_clone(current);
            set_path(&mut next, namespace, entry)?;
            Ok(Plan::Replace(next))
        }
    }
}

/// Subscriber-side half of the reset extension
pub struct Interceptor {
    trigger: String,
    baseline: Rc<RefCell<Baseline>>,
    diagnostics: Option<DiagnosticSink>,
}

impl Interceptor {
    /// Create an interceptor over a shared baseline
    #[must_use]
    pub fn new(
        trigger: String,
        baseline: Rc<RefCell<Baseline>>,
        diagnostics: Option<DiagnosticSink>,
    ) -> Self {
        Self {
            trigger,
            baseline,
            diagnostics,
        }
    }

    /// Handle one committed mutation; returns how it was classified
    ///
    /// # Errors
    ///
    /// Returns error if the baseline is busy or the replacement cannot be built
    pub fn on_mutation(
        &self,
        mutation: &Mutation,
        store: &mut dyn HostStore,
    ) -> ResetResult<MutationClass> {
        let class = match classify(&mutation.kind, &self.trigger) {
            // The mutation prefix only names the module; its state may sit deeper.
            MutationClass::NamespacedReset(prefix) => {
                MutationClass::NamespacedReset(store.module_path(&prefix).unwrap_or(prefix))
            }
            class => class,
        };
        if !class.is_reset() {
            return Ok(class);
        }
        tracing::debug!(mutation = %mutation.kind, ?class, "reset trigger matched");

        let next = {
            let baseline = self
                .baseline
                .try_borrow()
                .map_err(|_| ResetError::BaselineBusy)?;
            plan(&class, store.state(), &baseline)?
        };

        match next {
            Plan::Replace(tree) => {
                store.replace_state(tree);
                match &class {
                    MutationClass::NamespacedReset(namespace) => {
                        tracing::info!(%namespace, "namespace reset to baseline");
                    }
                    _ => tracing::info!("state reset to baseline"),
                }
            }
            Plan::UnknownNamespace(namespace) => self.report(Diagnostic::UnknownNamespace { namespace }),
            Plan::Skip => {}
        }
        Ok(class)
    }

    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "reset skipped");
        if let Some(sink) = &self.diagnostics {
            sink(&diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ns(s: &str) -> NamespacePath {
        NamespacePath::parse(s).unwrap()
    }

    fn baseline() -> Baseline {
        Baseline::capture(&json!({
            "message": "Hello!",
            "song": {"name": "Messy Love", "collections": []},
            "route": {"path": "/"}
        }))
        .unwrap()
    }

    #[test]
    fn test_plan_ignored() {
        let plan = plan(&MutationClass::Ignored, &json!({}), &baseline()).unwrap();
        assert_eq!(plan, Plan::Skip);
    }

    #[test]
    fn test_plan_global_keeps_current_route() {
        let current = json!({
            "message": "Yo!",
            "song": {"name": "One Touch", "collections": ["Summer"]},
            "route": {"path": "/welcome"}
        });
        let plan = plan(&MutationClass::GlobalReset, &current, &baseline()).unwrap();
        assert_eq!(
            plan,
            Plan::Replace(json!({
                "message": "Hello!",
                "song": {"name": "Messy Love", "collections": []},
                "route": {"path": "/welcome"}
            }))
        );
    }

    #[test]
    fn test_plan_global_without_live_route() {
        let baseline = Baseline::capture(&json!({"message": "Hello!"})).unwrap();
        let plan = plan(&MutationClass::GlobalReset, &json!({"message": "Yo!"}), &baseline).unwrap();
        assert_eq!(plan, Plan::Replace(json!({"message": "Hello!"})));
    }

    #[test]
    fn test_plan_global_null_route_counts_as_absent() {
        let current = json!({"message": "Yo!", "route": null});
        let plan = plan(&MutationClass::GlobalReset, &current, &baseline()).unwrap();
        assert_eq!(
            plan,
            Plan::Replace(json!({
                "message": "Hello!",
                "song": {"name": "Messy Love", "collections": []},
                "route": {"path": "/"}
            }))
        );
    }

    #[test]
    fn test_plan_namespaced_leaves_siblings() {
        let current = json!({
            "message": "Yo!",
            "song": {"name": "One Touch", "collections": ["Summer"]},
            "route": {"path": "/welcome"}
        });
        let plan = plan(&MutationClass::NamespacedReset(ns("song")), &current, &baseline()).unwrap();
        assert_eq!(
            plan,
            Plan::Replace(json!({
                "message": "Yo!",
                "song": {"name": "Messy Love", "collections": []},
                "route": {"path": "/welcome"}
            }))
        );
    }

    #[test]
    fn test_plan_namespaced_unknown() {
        let plan = plan(&MutationClass::NamespacedReset(ns("album")), &json!({}), &baseline()).unwrap();
        assert_eq!(plan, Plan::UnknownNamespace(ns("album")));
    }

    #[test]
    fn test_on_mutation_reports_unknown_namespace() {
        use baseline_store::{MemoryStore, ModuleDescriptor};

        let mut store = MemoryStore::new(ModuleDescriptor::new(json!({"message": "Hello!"}))).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = seen.clone();
        let sink: DiagnosticSink = Rc::new(move |d: &Diagnostic| sink_seen.borrow_mut().push(d.clone()));
        let interceptor = Interceptor::new(
            "reset".to_string(),
            Rc::new(RefCell::new(Baseline::capture(store.state()).unwrap())),
            Some(sink),
        );

        let class = interceptor
            .on_mutation(&Mutation::new("album/reset", json!(null)), &mut store)
            .unwrap();
        assert_eq!(class, MutationClass::NamespacedReset(ns("album")));
        assert_eq!(store.replacements(), 0);
        assert_eq!(
            *seen.borrow(),
            vec![Diagnostic::UnknownNamespace { namespace: ns("album") }]
        );
    }

    #[test]
    fn test_on_mutation_busy_baseline() {
        use baseline_store::{MemoryStore, ModuleDescriptor};

        let mut store = MemoryStore::new(ModuleDescriptor::new(json!({}))).unwrap();
        let shared = Rc::new(RefCell::new(Baseline::capture(store.state()).unwrap()));
        let interceptor = Interceptor::new("reset".to_string(), shared.clone(), None);

        let _guard = shared.borrow_mut();
        let err = interceptor
            .on_mutation(&Mutation::new("reset", json!(null)), &mut store)
            .unwrap_err();
        assert_eq!(err, ResetError::BaselineBusy);
    }
}
