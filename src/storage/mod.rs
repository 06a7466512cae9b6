//! Storage Engine
//!
//! In-memory registry of the databases hosted by a node.

mod registry;

pub use registry::DatabaseRegistry;
