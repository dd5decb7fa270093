//! # Domain Layer
//!
//! Core marketplace concepts, free of I/O: asset records, the bookkeeping
//! structures, the settlement split, and the invariant checks over them.

pub mod book;
pub mod entities;
pub mod invariants;
pub mod listing_index;
pub mod owner_index;
pub mod store;
pub mod value_objects;
