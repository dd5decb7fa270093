//! Cross-component integration tests for the marketplace engine.

pub mod invariants;
pub mod reentrancy;
