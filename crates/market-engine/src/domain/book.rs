//! # Market Book
//!
//! The aggregate the engine mutates under its state lock: the record store
//! plus the two index structures. Grouping them keeps every commit of a
//! marketplace operation a single borrow.

use crate::domain::listing_index::ListingIndex;
use crate::domain::owner_index::OwnerIndex;
use crate::domain::store::AssetRecordStore;

/// Record store and indices, mutated together.
#[derive(Clone, Debug, Default)]
pub struct MarketBook {
    /// One record per minted asset.
    pub store: AssetRecordStore,
    /// Owner-to-holdings index.
    pub owners: OwnerIndex,
    /// Currently-listed asset IDs.
    pub listings: ListingIndex,
}

impl MarketBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
