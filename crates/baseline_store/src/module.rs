//! Module descriptors.
//!
//! A module contributes a sub-tree of state, the mutation handlers that
//! operate on it and, optionally, nested child modules.

use baseline_core::{CoreResult, StateTree, deep_clone_checked};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

/// Mutation handler: receives the module's local state and the payload
pub type MutationHandler = Rc<dyn Fn(&mut StateTree, &Value)>;

/// Declarative description of a module
#[derive(Clone)]
pub struct ModuleDescriptor {
    /// Whether mutation types are prefixed with the module path
    pub namespaced: bool,
    /// Initial local state, without child module state
    pub state: StateTree,
    /// Handlers keyed by local mutation name
    pub mutations: IndexMap<String, MutationHandler>,
    /// Child modules keyed by name
    pub modules: IndexMap<String, ModuleDescriptor>,
}

impl ModuleDescriptor {
    /// Create a non-namespaced module with the given initial state
    #[must_use]
    pub fn new(state: StateTree) -> Self {
        Self {
            namespaced: false,
            state,
            mutations: IndexMap::new(),
            modules: IndexMap::new(),
        }
    }

    /// Mark the module as namespaced
    #[must_use]
    pub fn namespaced(mut self) -> Self {
        self.namespaced = true;
        self
    }

    /// Add a mutation handler
    #[must_use]
    pub fn with_mutation<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut StateTree, &Value) + 'static,
    {
        self.mutations.insert(name.into(), Rc::new(handler));
        self
    }

    /// Add a child module
    #[must_use]
    pub fn with_module(mut self, name: impl Into<String>, module: ModuleDescriptor) -> Self {
        self.modules.insert(name.into(), module);
        self
    }

    /// Full initial sub-tree: local state with every child module's initial
    /// state nested under the child's name.
    ///
    /// # Errors
    ///
    /// Returns error if the state cannot be copied
    pub fn initial_state(&self) -> CoreResult<StateTree> {
        let mut tree = deep_clone_checked(&self.state)?;
        if self.modules.is_empty() {
            return Ok(tree);
        }
        if !tree.is_object() {
            tree = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut tree {
            for (name, child) in &self.modules {
                map.insert(name.clone(), child.initial_state()?);
            }
        }
        Ok(tree)
    }
}

impl Default for ModuleDescriptor {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("namespaced", &self.namespaced)
            .field("state", &self.state)
            .field("mutations", &self.mutations.keys().collect::<Vec<_>>())
            .field("modules", &self.modules)
            .finish()
    }
}
