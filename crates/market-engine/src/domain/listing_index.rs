//! # Listing Index
//!
//! The collection of currently-listed asset IDs. Unordered: removal swaps
//! with the last element, so callers must not rely on insertion order.
//! Enumeration order is stable within a single read.

use crate::domain::value_objects::AssetId;

// =============================================================================
// INDEX
// =============================================================================

/// Listed-asset index.
#[derive(Clone, Debug, Default)]
pub struct ListingIndex {
    listed: Vec<AssetId>,
}

impl ListingIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` to the listed set.
    ///
    /// Not idempotent: callers guarantee `id` is not already present (the
    /// engine rejects double-listing before reaching this point).
    pub fn add(&mut self, id: AssetId) {
        self.listed.push(id);
    }

    /// Removes the single matching entry via swap-remove. No-op when absent.
    pub fn remove(&mut self, id: AssetId) {
        if let Some(pos) = self.listed.iter().position(|&listed| listed == id) {
            self.listed.swap_remove(pos);
        }
    }

    /// Returns true if `id` is currently listed.
    #[must_use]
    pub fn contains(&self, id: AssetId) -> bool {
        self.listed.contains(&id)
    }

    /// Enumerates the listed IDs.
    pub fn iter(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.listed.iter().copied()
    }

    /// Number of listed assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listed.len()
    }

    /// Returns true if nothing is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listed.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
