//! In-memory reference store.

use crate::contract::{HostStore, Subscriber};
use crate::error::{StoreError, StoreResult};
use crate::module::{ModuleDescriptor, MutationHandler};
use crate::mutation::Mutation;
use baseline_core::{NamespacePath, StateTree, get_path_mut, remove_path, set_path};
use indexmap::IndexMap;
use serde_json::Value;

/// A registered (non-root) module
#[derive(Debug, Clone, PartialEq, Eq)]
struct RegisteredModule {
    namespaced: bool,
    /// Prefix prepended to this module's mutation names
    prefix: String,
}

/// A handler bound to the module whose local state it receives
#[derive(Clone)]
struct Registration {
    owner: NamespacePath,
    handler: MutationHandler,
}

/// Single-threaded store holding one state tree.
///
/// Mutations are committed synchronously: handlers run first, then every
/// subscriber is notified in registration order.
pub struct MemoryStore {
    state: StateTree,
    modules: IndexMap<NamespacePath, RegisteredModule>,
    handlers: IndexMap<String, Vec<Registration>>,
    subscribers: Vec<Subscriber>,
    commits: u64,
    replacements: u64,
}

impl MemoryStore {
    /// Build a store from its root module
    ///
    /// # Errors
    ///
    /// Returns error if a module name is invalid or the state cannot be copied
    pub fn new(root: ModuleDescriptor) -> StoreResult<Self> {
        let state = root.initial_state()?;
        let mut store = Self {
            state,
            modules: IndexMap::new(),
            handlers: IndexMap::new(),
            subscribers: Vec::new(),
            commits: 0,
            replacements: 0,
        };
        store.install_module(&NamespacePath::root(), "", &root)?;
        Ok(store)
    }

    /// Commit a mutation
    ///
    /// # Errors
    ///
    /// Returns `UnknownMutation` if no handler is registered for `kind`
    /// (subscribers are not notified), or the first subscriber error
    pub fn commit(&mut self, kind: &str, payload: Value) -> StoreResult<()> {
        let registrations = self
            .handlers
            .get(kind)
            .cloned()
            .ok_or_else(|| StoreError::UnknownMutation {
                mutation: kind.to_string(),
            })?;

        for registration in &registrations {
            let local = get_path_mut(&mut self.state, &registration.owner).ok_or_else(|| {
                StoreError::MissingModuleState {
                    namespace: registration.owner.to_string(),
                }
            })?;
            (registration.handler)(local, &payload);
        }
        self.commits += 1;
        tracing::trace!(mutation = kind, "mutation committed");

        self.notify(&Mutation::new(kind, payload))
    }

    /// Number of committed mutations
    #[must_use]
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Number of whole-tree replacements
    #[must_use]
    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    /// Number of registered subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self, mutation: &Mutation) -> StoreResult<()> {
        // Subscribers added while notifying are kept but only see later commits.
        let mut active = std::mem::take(&mut self.subscribers);
        let mut result = Ok(());
        for subscriber in &mut active {
            if let Err(err) = subscriber(mutation, &mut *self as &mut dyn HostStore) {
                result = Err(err);
                break;
            }
        }
        active.append(&mut self.subscribers);
        self.subscribers = active;
        result
    }

    fn install_module(
        &mut self,
        path: &NamespacePath,
        parent_prefix: &str,
        module: &ModuleDescriptor,
    ) -> StoreResult<()> {
        let prefix = match path.name() {
            Some(name) if module.namespaced => format!("{}{}/", parent_prefix, name),
            _ => parent_prefix.to_string(),
        };

        if !path.is_root() {
            self.modules.insert(
                path.clone(),
                RegisteredModule {
                    namespaced: module.namespaced,
                    prefix: prefix.clone(),
                },
            );
        }

        for (name, handler) in &module.mutations {
            self.handlers
                .entry(format!("{}{}", prefix, name))
                .or_default()
                .push(Registration {
                    owner: path.clone(),
                    handler: handler.clone(),
                });
        }

        for (name, child) in &module.modules {
            self.install_module(&path.join(name)?, &prefix, child)?;
        }
        Ok(())
    }

    fn prefix_of(&self, path: &NamespacePath) -> Option<&str> {
        if path.is_root() {
            return Some("");
        }
        self.modules.get(path).map(|m| m.prefix.as_str())
    }
}

fn is_within(path: &NamespacePath, ancestor: &NamespacePath) -> bool {
    path.segments().starts_with(ancestor.segments())
}

impl HostStore for MemoryStore {
    fn state(&self) -> &StateTree {
        &self.state
    }

    fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    fn replace_state(&mut self, state: StateTree) {
        self.state = state;
        self.replacements += 1;
        tracing::trace!(replacements = self.replacements, "state replaced");
    }

    fn register_module(
        &mut self,
        namespace: &NamespacePath,
        module: ModuleDescriptor,
    ) -> StoreResult<()> {
        let Some(parent) = namespace.parent() else {
            return Err(StoreError::RootModule {
                operation: "registered".to_string(),
            });
        };
        if self.modules.contains_key(namespace) {
            return Err(StoreError::ModuleExists {
                namespace: namespace.to_string(),
            });
        }
        let parent_prefix = self
            .prefix_of(&parent)
            .ok_or_else(|| StoreError::ParentNotFound {
                namespace: namespace.to_string(),
            })?
            .to_string();

        set_path(&mut self.state, namespace, module.initial_state()?)?;
        self.install_module(namespace, &parent_prefix, &module)?;
        tracing::debug!(%namespace, namespaced = module.namespaced, "module registered");
        Ok(())
    }

    fn unregister_module(&mut self, namespace: &NamespacePath) -> StoreResult<()> {
        if namespace.is_root() {
            return Err(StoreError::RootModule {
                operation: "unregistered".to_string(),
            });
        }
        if !self.modules.contains_key(namespace) {
            return Err(StoreError::ModuleNotFound {
                namespace: namespace.to_string(),
            });
        }

        self.modules.retain(|path, _| !is_within(path, namespace));
        for registrations in self.handlers.values_mut() {
            registrations.retain(|r| !is_within(&r.owner, namespace));
        }
        self.handlers.retain(|_, registrations| !registrations.is_empty());
        remove_path(&mut self.state, namespace);
        tracing::debug!(%namespace, "module unregistered");
        Ok(())
    }

    fn module_path(&self, prefix: &NamespacePath) -> Option<NamespacePath> {
        let wanted = prefix.mutation_prefix();
        self.modules
            .iter()
            .find(|(_, module)| module.namespaced && module.prefix == wanted)
            .map(|(path, _)| path.clone())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("state", &self.state)
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .field("mutations", &self.handlers.keys().collect::<Vec<_>>())
            .field("subscribers", &self.subscribers.len())
            .field("commits", &self.commits)
            .field("replacements", &self.replacements)
            .finish()
    }
}
