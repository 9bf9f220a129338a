//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! configured addresses
//!     → registry.rs (parse once, freeze order)
//!     → round_robin.rs (atomic counter → index modulo len)
//!     → backend.rs (address handed to the forwarder)
//! ```
//!
//! # Design Decisions
//! - Registry is immutable; no health state, no weights
//! - The only shared mutable state is the selection counter
//! - An empty registry is rejected when the selector is built, never at selection time

pub mod backend;
pub mod registry;
pub mod round_robin;

pub use backend::Backend;
pub use registry::BackendRegistry;
pub use round_robin::{RoundRobin, Selection};
