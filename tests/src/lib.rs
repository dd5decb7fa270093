//! # Prompt-Market Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── settlement.rs   # Commission split, refunds, unwind on payment failure
//!     ├── reentrancy.rs   # Adversarial callback-into-engine scenarios
//!     └── invariants.rs   # Invariant audits over randomized operation sequences
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p market-tests
//!
//! # By category
//! cargo test -p market-tests integration::settlement
//! cargo test -p market-tests integration::reentrancy
//! ```

#![allow(dead_code)]

pub mod integration;
