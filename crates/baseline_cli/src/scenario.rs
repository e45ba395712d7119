//! Declarative scenarios: a store layout, reset options and a list of steps.

use baseline_core::StateTree;
use baseline_reset::{ConfigError, ResetConfig, ResetError, ResetHandle, install};
use baseline_store::{HostStore, MemoryStore, ModuleDescriptor, Mutation, StoreError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Scenario errors
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Scenario file could not be read or written
    #[error("I/O error on {path}: {reason}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        reason: String,
    },

    /// Scenario document is malformed
    #[error("Invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reset options are malformed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reset extension failure
    #[error(transparent)]
    Reset(#[from] ResetError),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Scenario result type
pub type ScenarioResult<T> = Result<T, ScenarioError>;

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// What a scenario mutation does to its module's local state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MutationSpec {
    /// Write the payload to `field`
    Set {
        /// Target field
        field: String,
    },
    /// Append the payload to the array at `field`
    Push {
        /// Target field
        field: String,
    },
    /// Do nothing (trigger mutations)
    Noop,
}

/// A module in a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Whether mutation types are prefixed with the module path
    #[serde(default)]
    pub namespaced: bool,
    /// Initial local state
    #[serde(default = "empty_object")]
    pub state: Value,
    /// Mutations by local name
    #[serde(default)]
    pub mutations: IndexMap<String, MutationSpec>,
    /// Child modules
    #[serde(default)]
    pub modules: IndexMap<String, ModuleSpec>,
}

impl ModuleSpec {
    /// Build the store-side descriptor
    #[must_use]
    pub fn descriptor(&self) -> ModuleDescriptor {
        let mut module = ModuleDescriptor::new(self.state.clone());
        module.namespaced = self.namespaced;
        for (name, spec) in &self.mutations {
            module = attach(module, name, spec);
        }
        for (name, child) in &self.modules {
            module = module.with_module(name.clone(), child.descriptor());
        }
        module
    }
}

fn attach(module: ModuleDescriptor, name: &str, spec: &MutationSpec) -> ModuleDescriptor {
    match spec.clone() {
        MutationSpec::Set { field } => module.with_mutation(name, move |state, payload| {
            if let Some(map) = state.as_object_mut() {
                map.insert(field.clone(), payload.clone());
            }
        }),
        MutationSpec::Push { field } => module.with_mutation(name, move |state, payload| {
            if let Some(items) = state.get_mut(field.as_str()).and_then(Value::as_array_mut) {
                items.push(payload.clone());
            }
        }),
        MutationSpec::Noop => module.with_mutation(name, |_, _| {}),
    }
}

/// One scenario step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Commit a mutation
    Commit(Mutation),
    /// Register a module and record it in the baseline
    Register {
        /// Module path
        namespace: String,
        /// Module to register
        module: ModuleSpec,
    },
    /// Unregister a module and drop its baseline entry
    Unregister {
        /// Module path
        namespace: String,
    },
}

/// A complete scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Root state
    #[serde(default = "empty_object")]
    pub state: Value,
    /// Root mutations
    #[serde(default)]
    pub mutations: IndexMap<String, MutationSpec>,
    /// Modules present at construction
    #[serde(default)]
    pub modules: IndexMap<String, ModuleSpec>,
    /// Raw reset options (`trigger`, `ssr`)
    #[serde(default = "empty_object")]
    pub config: Value,
    /// Steps to run after install
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Result of running a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Final state tree
    pub state: StateTree,
    /// Committed mutations
    pub commits: u64,
    /// Whole-tree replacements (hydration and resets)
    pub replacements: u64,
}

impl Scenario {
    /// Read a scenario from a JSON file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> ScenarioResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ScenarioError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&raw)
    }

    /// Parse a scenario from JSON text
    ///
    /// # Errors
    ///
    /// Returns error if the document is malformed
    pub fn parse(raw: &str) -> ScenarioResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    fn root(&self) -> ModuleSpec {
        ModuleSpec {
            namespaced: false,
            state: self.state.clone(),
            mutations: self.mutations.clone(),
            modules: self.modules.clone(),
        }
    }

    /// Build the store and install the reset extension, without running steps
    ///
    /// # Errors
    ///
    /// Returns error if the options are invalid or the store cannot be built
    pub fn prepare(&self) -> ScenarioResult<(MemoryStore, ResetHandle)> {
        let config = ResetConfig::from_value(&self.config)?;
        let mut store = MemoryStore::new(self.root().descriptor())?;
        let handle = install(config)?.apply(&mut store)?;
        Ok((store, handle))
    }

    /// Run every step and report the final state
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error
    pub fn run(&self) -> ScenarioResult<Outcome> {
        let (mut store, handle) = self.prepare()?;
        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(index, ?step, "running step");
            match step {
                Step::Commit(mutation) => store.commit(&mutation.kind, mutation.payload.clone())?,
                Step::Register { namespace, module } => {
                    handle.register_module_state(&mut store, namespace, module.descriptor())?;
                }
                Step::Unregister { namespace } => {
                    handle.unregister_module_state(&mut store, namespace)?;
                }
            }
        }
        Ok(Outcome {
            state: store.state().clone(),
            commits: store.commits(),
            replacements: store.replacements(),
        })
    }
}
