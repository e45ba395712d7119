//! Reset extension configuration.

use crate::diagnostic::{Diagnostic, DiagnosticSink};
use baseline_core::SEPARATOR;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

/// Action name that triggers a reset unless configured otherwise
pub const DEFAULT_TRIGGER: &str = "reset";

/// Configuration errors, reported at install time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Options are not a mapping
    #[error("options must be a mapping, got {found}")]
    NotAMapping {
        /// JSON type found instead
        found: String,
    },

    /// `trigger` is not a string
    #[error("trigger must be a string, got {found}")]
    TriggerNotString {
        /// JSON type found instead
        found: String,
    },

    /// `trigger` is empty
    #[error("trigger must not be empty")]
    EmptyTrigger,

    /// `trigger` contains the namespace separator
    #[error("trigger '{trigger}' must not contain '/'")]
    TriggerHasSeparator {
        /// Offending trigger
        trigger: String,
    },

    /// `ssr` is not a mapping
    #[error("ssr must be a mapping, got {found}")]
    SsrNotMapping {
        /// JSON type found instead
        found: String,
    },
}

/// Reset extension configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Action name that initiates a reset
    #[serde(default = "default_trigger")]
    pub trigger: String,
    /// Hydration data merged into live state once at install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssr: Option<Map<String, Value>>,
    /// Receives non-fatal conditions such as unknown-namespace resets
    #[serde(skip)]
    pub on_diagnostic: Option<DiagnosticSink>,
}

fn default_trigger() -> String {
    DEFAULT_TRIGGER.to_string()
}

fn json_type(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
    .to_string()
}

impl ResetConfig {
    /// Create a configuration with the default trigger and no hydration
    #[must_use]
    pub fn new() -> Self {
        Self {
            trigger: default_trigger(),
            ssr: None,
            on_diagnostic: None,
        }
    }

    /// Set the trigger action name
    #[must_use]
    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = trigger.into();
        self
    }

    /// Set hydration data
    #[must_use]
    pub fn with_ssr(mut self, ssr: Map<String, Value>) -> Self {
        self.ssr = Some(ssr);
        self
    }

    /// Set the diagnostic callback
    #[must_use]
    pub fn with_diagnostics<F>(mut self, sink: F) -> Self
    where
        F: Fn(&Diagnostic) + 'static,
    {
        self.on_diagnostic = Some(Rc::new(sink));
        self
    }

    /// Parse raw options.
    ///
    /// Recognized keys are `trigger` and `ssr`; other keys are ignored. A
    /// `null` `ssr` means no hydration.
    ///
    /// # Errors
    ///
    /// Returns error if the options or a recognized key have the wrong type,
    /// or the trigger is invalid
    pub fn from_value(options: &Value) -> Result<Self, ConfigError> {
        let map = options.as_object().ok_or_else(|| ConfigError::NotAMapping {
            found: json_type(options),
        })?;

        let mut config = Self::new();
        match map.get("trigger") {
            None => {}
            Some(Value::String(trigger)) => config.trigger = trigger.clone(),
            Some(other) => {
                return Err(ConfigError::TriggerNotString {
                    found: json_type(other),
                });
            }
        }
        match map.get("ssr") {
            None | Some(Value::Null) => {}
            Some(Value::Object(ssr)) => config.ssr = Some(ssr.clone()),
            Some(other) => {
                return Err(ConfigError::SsrNotMapping {
                    found: json_type(other),
                });
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the trigger is empty or contains the separator
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger.is_empty() {
            return Err(ConfigError::EmptyTrigger);
        }
        if self.trigger.contains(SEPARATOR) {
            return Err(ConfigError::TriggerHasSeparator {
                trigger: self.trigger.clone(),
            });
        }
        Ok(())
    }
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetConfig")
            .field("trigger", &self.trigger)
            .field("ssr", &self.ssr)
            .field("on_diagnostic", &self.on_diagnostic.is_some())
            .finish()
    }
}
