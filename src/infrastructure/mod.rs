//! Adapters implementing the domain ports.

pub mod in_memory;
pub mod reference;
pub mod scheduler;
pub mod tracing_sink;
