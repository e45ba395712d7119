//! Installing the reset extension on a host store.

use crate::baseline::{Baseline, hydrate};
use crate::config::ResetConfig;
use crate::error::{ResetError, ResetResult};
use crate::interceptor::Interceptor;
use baseline_core::{NamespacePath, StateTree};
use baseline_store::{HostStore, ModuleDescriptor, StoreError, subscriber};
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

/// Validate `config` and prepare an installer
///
/// # Errors
///
/// Returns `Config` if the configuration is invalid
pub fn install(config: ResetConfig) -> ResetResult<Installer> {
    config.validate()?;
    Ok(Installer { config })
}

/// A validated configuration waiting for a store
#[derive(Debug, Clone)]
pub struct Installer {
    config: ResetConfig,
}

impl Installer {
    /// Capture the baseline, apply hydration and subscribe to `store`.
    ///
    /// # Errors
    ///
    /// Returns error if the live state cannot be captured or hydrated
    pub fn apply<S: HostStore + ?Sized>(self, store: &mut S) -> ResetResult<ResetHandle> {
        let ResetConfig {
            trigger,
            ssr,
            on_diagnostic,
        } = self.config;

        let baseline = Rc::new(RefCell::new(Baseline::capture(store.state())?));
        if let Some(data) = &ssr {
            hydrate(&mut *store, data)?;
        }

        let interceptor = Interceptor::new(trigger.clone(), baseline.clone(), on_diagnostic);
        store.subscribe(subscriber(move |mutation, host| {
            interceptor
                .on_mutation(mutation, host)
                .map(drop)
                .map_err(StoreError::from)
        }));
        tracing::debug!(%trigger, hydrated = ssr.is_some(), "reset extension installed");

        Ok(ResetHandle { trigger, baseline })
    }
}

/// Handle to an installed reset extension.
///
/// Provides the module operations that keep the baseline in step with the
/// store's registered modules.
#[derive(Debug, Clone)]
pub struct ResetHandle {
    trigger: String,
    baseline: Rc<RefCell<Baseline>>,
}

impl ResetHandle {
    /// Register a module with the store and record its initial state in the
    /// baseline
    ///
    /// # Errors
    ///
    /// Returns error for a malformed namespace, a state clone failure, a busy
    /// baseline or a store registration failure; the baseline is untouched in
    /// each case, and the store is untouched unless its own registration failed
    pub fn register_module_state<S: HostStore + ?Sized>(
        &self,
        store: &mut S,
        namespace: &str,
        module: ModuleDescriptor,
    ) -> ResetResult<()> {
        let namespace = NamespacePath::parse(namespace)?;
        let initial = module.initial_state()?;
        let mut baseline = self.baseline_mut()?;
        store.register_module(&namespace, module)?;
        baseline.add_namespace(&namespace, &initial)
    }

    /// Unregister a module from the store and drop its baseline entry
    ///
    /// # Errors
    ///
    /// Returns error for a malformed namespace, a busy baseline or a store
    /// failure; neither side changes in any of these cases
    pub fn unregister_module_state<S: HostStore + ?Sized>(
        &self,
        store: &mut S,
        namespace: &str,
    ) -> ResetResult<()> {
        let namespace = NamespacePath::parse(namespace)?;
        let mut baseline = self.baseline_mut()?;
        store.unregister_module(&namespace)?;
        baseline.remove_namespace(&namespace);
        Ok(())
    }

    /// Trigger action name
    #[must_use]
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Copy of the current baseline
    ///
    /// # Errors
    ///
    /// Returns `BaselineBusy` if called while the baseline is being updated
    pub fn baseline(&self) -> ResetResult<StateTree> {
        Ok(self
            .baseline
            .try_borrow()
            .map_err(|_| ResetError::BaselineBusy)?
            .snapshot_root())
    }

    fn baseline_mut(&self) -> ResetResult<RefMut<'_, Baseline>> {
        self.baseline
            .try_borrow_mut()
            .map_err(|_| ResetError::BaselineBusy)
    }
}
