//! The host-store contract.
//!
//! Extensions such as the reset extension only talk to a store through this
//! trait, so any store that can expose its state tree, deliver committed
//! mutations in order and swap its whole tree atomically can host them.

use crate::error::StoreResult;
use crate::module::ModuleDescriptor;
use crate::mutation::Mutation;
use baseline_core::{NamespacePath, StateTree};

/// Callback invoked after every committed mutation, in commit order.
///
/// The store passes itself so the subscriber can read the post-mutation
/// state and request a `replace_state`.
pub type Subscriber = Box<dyn FnMut(&Mutation, &mut dyn HostStore) -> StoreResult<()>>;

/// Operations a host store offers to extensions
pub trait HostStore {
    /// Current state tree
    fn state(&self) -> &StateTree;

    /// Register a subscriber; it sees every mutation committed afterwards
    fn subscribe(&mut self, subscriber: Subscriber);

    /// Atomically replace the whole state tree
    fn replace_state(&mut self, state: StateTree);

    /// Add a module's state and handlers at `namespace`
    ///
    /// # Errors
    ///
    /// Returns error if the module cannot be registered at that path
    fn register_module(
        &mut self,
        namespace: &NamespacePath,
        module: ModuleDescriptor,
    ) -> StoreResult<()>;

    /// Remove the module at `namespace` with its state and handlers
    ///
    /// # Errors
    ///
    /// Returns error if no module is registered at that path
    fn unregister_module(&mut self, namespace: &NamespacePath) -> StoreResult<()>;

    /// State path of the namespaced module whose mutation types start with
    /// `prefix`, `None` if no module owns that prefix.
    ///
    /// The two differ when a namespaced module sits under a plain one: the
    /// plain parent adds a state level but no mutation prefix.
    fn module_path(&self, prefix: &NamespacePath) -> Option<NamespacePath>;
}

/// Box a closure as a `Subscriber`
pub fn subscriber<F>(f: F) -> Subscriber
where
    F: FnMut(&Mutation, &mut dyn HostStore) -> StoreResult<()> + 'static,
{
    Box::new(f)
}
