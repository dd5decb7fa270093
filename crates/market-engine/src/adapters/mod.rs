//! # Adapters
//!
//! In-memory implementations of the outbound ports. Production deployments
//! bind the engine to a real ledger and payment substrate; these adapters
//! carry the same contracts for local use and the test suite.

pub mod event_sinks;
pub mod memory_bank;
pub mod memory_registry;

pub use event_sinks::{RecordingEvents, TracingEvents};
pub use memory_bank::InMemoryBank;
pub use memory_registry::InMemoryRegistry;
