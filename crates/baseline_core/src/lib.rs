//! BASELINE Core Types
//!
//! This crate contains pure types and logic with no I/O.
//! State trees are `serde_json::Value` documents; every copy handed out by
//! this crate is fully owned.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod merge;
pub mod mutation_type;
pub mod tree;

// Re-exports
pub use error::{CoreError, CoreResult};
pub use merge::{merge, merge_into};
pub use mutation_type::{MutationType, NamespacePath, SEPARATOR};
pub use tree::{
    MAX_TREE_DEPTH, StateTree, deep_clone, deep_clone_checked, depth, get_path, get_path_mut, remove_path,
    set_path, to_state_tree,
};
