//! BASELINE Host Store
//!
//! The contract a host store offers to extensions (`HostStore`) and an
//! in-memory implementation of it (`MemoryStore`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod memory;
pub mod module;
pub mod mutation;

pub use contract::{HostStore, Subscriber, subscriber};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use module::{ModuleDescriptor, MutationHandler};
pub use mutation::Mutation;
