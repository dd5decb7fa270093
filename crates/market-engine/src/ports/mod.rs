//! # Ports
//!
//! Hexagonal boundaries of the engine: the inbound API callers drive, and
//! the outbound interfaces the engine depends on (registry, payments,
//! notifications). Dependencies point inward; adapters implement these.

pub mod inbound;
pub mod outbound;
