//! BASELINE Reset Extension
//!
//! Committing the configured trigger restores the whole state tree, or a
//! single namespace, to a baseline captured at install time. The `route`
//! namespace survives whole-tree resets.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod baseline;
pub mod classify;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod interceptor;
pub mod plugin;

pub use baseline::{Baseline, hydrate};
pub use classify::{MutationClass, classify};
pub use config::{ConfigError, DEFAULT_TRIGGER, ResetConfig};
pub use diagnostic::{Diagnostic, DiagnosticSink};
pub use error::{ResetError, ResetResult};
pub use interceptor::{Interceptor, Plan, ROUTE_NAMESPACE, plan};
pub use plugin::{Installer, ResetHandle, install};
