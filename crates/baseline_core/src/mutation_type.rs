//! Mutation-type parsing.
//!
//! A committed mutation is identified by a string of the form
//! `[namespace/]*name`. The segment after the last separator is the action
//! name; everything before it is the namespace path.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separator between namespace segments and the action name
pub const SEPARATOR: char = '/';

/// Path of a namespace inside the state tree.
///
/// The empty path is the root namespace. A multi-segment path such as
/// `a/b` addresses the nested sub-tree `state["a"]["b"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    /// The root namespace
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-separated namespace.
    ///
    /// The empty string is the root namespace. Empty segments are rejected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNamespace` if any segment is empty
    pub fn parse(namespace: &str) -> CoreResult<Self> {
        if namespace.is_empty() {
            return Ok(Self::root());
        }
        let segments: Vec<String> = namespace.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(CoreError::InvalidNamespace {
                namespace: namespace.to_string(),
                reason: "empty segment".to_string(),
            });
        }
        Ok(Self { segments })
    }

    /// Build a path from already-split segments
    ///
    /// # Errors
    ///
    /// Returns `InvalidNamespace` if a segment is empty or contains the separator
    pub fn from_segments<I, S>(segments: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            if segment.is_empty() || segment.contains(SEPARATOR) {
                return Err(CoreError::InvalidNamespace {
                    namespace: segments.join("/"),
                    reason: format!("bad segment '{}'", segment),
                });
            }
        }
        Ok(Self { segments })
    }

    /// Whether this is the root namespace
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path segments, outermost first
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as `is_root`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Parent path, `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.segments.split_last()?;
        Some(Self {
            segments: parent.to_vec(),
        })
    }

    /// Last segment, `None` for the root
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append a child segment
    ///
    /// # Errors
    ///
    /// Returns `InvalidNamespace` if `child` is empty or contains the separator
    pub fn join(&self, child: &str) -> CoreResult<Self> {
        let mut segments = self.segments.clone();
        segments.push(child.to_string());
        Self::from_segments(segments)
    }

    /// Prefix for mutation types committed inside this namespace (`a/b/`)
    #[must_use]
    pub fn mutation_prefix(&self) -> String {
        if self.is_root() {
            String::new()
        } else {
            format!("{}{}", self, SEPARATOR)
        }
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for NamespacePath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for NamespacePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NamespacePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A parsed mutation type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutationType {
    namespace: NamespacePath,
    action: String,
}

impl MutationType {
    /// Split a mutation type into namespace path and action name
    ///
    /// # Errors
    ///
    /// Returns `InvalidMutationType` for an empty action name or a malformed prefix
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let (prefix, action) = match raw.rsplit_once(SEPARATOR) {
            Some((prefix, action)) => (Some(prefix), action),
            None => (None, raw),
        };

        if action.is_empty() {
            return Err(CoreError::InvalidMutationType {
                mutation: raw.to_string(),
                reason: "empty action name".to_string(),
            });
        }

        let namespace = match prefix {
            None => NamespacePath::root(),
            Some("") => {
                return Err(CoreError::InvalidMutationType {
                    mutation: raw.to_string(),
                    reason: "leading separator".to_string(),
                });
            }
            Some(prefix) => {
                NamespacePath::parse(prefix).map_err(|e| CoreError::InvalidMutationType {
                    mutation: raw.to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        Ok(Self {
            namespace,
            action: action.to_string(),
        })
    }

    /// Namespace path (root for un-namespaced mutations)
    #[must_use]
    pub fn namespace(&self) -> &NamespacePath {
        &self.namespace
    }

    /// Action name
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace.mutation_prefix(), self.action)
    }
}

impl FromStr for MutationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
