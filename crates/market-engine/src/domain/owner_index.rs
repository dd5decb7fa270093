//! # Owner Index
//!
//! Maps each owner to the set of asset IDs it currently holds. Entries are
//! created lazily on first assignment and pruned when the last asset leaves.
//! Insertion order is not preserved: removal swaps with the last element.

use crate::domain::value_objects::{Address, AssetId};
use std::collections::HashMap;

// =============================================================================
// INDEX
// =============================================================================

/// Owner-to-holdings index.
#[derive(Clone, Debug, Default)]
pub struct OwnerIndex {
    holdings: HashMap<Address, Vec<AssetId>>,
}

impl OwnerIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` to `owner`'s holdings.
    ///
    /// Not idempotent: callers must not add the same (owner, id) pair twice
    /// without an intervening remove.
    pub fn add(&mut self, owner: Address, id: AssetId) {
        self.holdings.entry(owner).or_default().push(id);
    }

    /// Removes one occurrence of `id` from `owner`'s holdings via swap-remove.
    ///
    /// Silent no-op when absent; does not occur while invariants hold.
    pub fn remove(&mut self, owner: Address, id: AssetId) {
        if let Some(ids) = self.holdings.get_mut(&owner) {
            if let Some(pos) = ids.iter().position(|&held| held == id) {
                ids.swap_remove(pos);
            }
            if ids.is_empty() {
                self.holdings.remove(&owner);
            }
        }
    }

    /// Returns `owner`'s current holdings, in no particular order.
    #[must_use]
    pub fn holdings(&self, owner: Address) -> &[AssetId] {
        self.holdings.get(&owner).map_or(&[], Vec::as_slice)
    }

    /// Returns true if `owner` holds `id`.
    #[must_use]
    pub fn holds(&self, owner: Address, id: AssetId) -> bool {
        self.holdings(owner).contains(&id)
    }

    /// Iterates all (owner, holdings) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Vec<AssetId>)> {
        self.holdings.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
