//! Non-fatal conditions reported while handling mutations.

use baseline_core::NamespacePath;
use std::fmt;
use std::rc::Rc;

/// Callback receiving diagnostics
pub type DiagnosticSink = Rc<dyn Fn(&Diagnostic)>;

/// A condition the interceptor handled without failing the commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A namespaced reset targeted a namespace with no baseline entry; the
    /// state was left unchanged
    UnknownNamespace {
        /// Targeted namespace
        namespace: NamespacePath,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNamespace { namespace } => {
                write!(f, "reset of unknown namespace '{}' ignored", namespace)
            }
        }
    }
}
