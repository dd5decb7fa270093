//! # Asset Record Store
//!
//! Holds one [`AssetRecord`] per minted asset, keyed by [`AssetId`].
//! Records are created at mint and never deleted; burn is a registry concern
//! outside marketplace semantics.

use crate::domain::entities::AssetRecord;
use crate::domain::value_objects::{Address, Amount, AssetId};
use crate::errors::MarketError;
use std::collections::BTreeMap;

// =============================================================================
// STORE
// =============================================================================

/// Append-only store of asset records with a monotonic ID allocator.
#[derive(Clone, Debug, Default)]
pub struct AssetRecordStore {
    records: BTreeMap<AssetId, AssetRecord>,
    /// Last allocated ID. IDs are 1-based; 0 means nothing minted yet.
    last_id: u64,
}

impl AssetRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next sequential ID and stores a fresh record with
    /// `is_listed == false`.
    ///
    /// # Errors
    ///
    /// `IdSpaceExhausted` on ID counter overflow. Unreachable in practice.
    pub fn create(
        &mut self,
        uri: String,
        owner: Address,
        price: Amount,
        prompt: String,
        created_at: u64,
    ) -> Result<AssetId, MarketError> {
        let raw = self
            .last_id
            .checked_add(1)
            .ok_or(MarketError::IdSpaceExhausted)?;
        self.last_id = raw;
        let id = AssetId(raw);
        self.records.insert(
            id,
            AssetRecord {
                id,
                uri,
                owner,
                price,
                is_listed: false,
                prompt,
                created_at,
            },
        );
        Ok(id)
    }

    /// Returns the record for `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` was never minted.
    pub fn get(&self, id: AssetId) -> Result<&AssetRecord, MarketError> {
        self.records.get(&id).ok_or(MarketError::NotFound(id))
    }

    /// Returns true if `id` has been minted.
    #[must_use]
    pub fn exists(&self, id: AssetId) -> bool {
        self.records.contains_key(&id)
    }

    /// Sets the asking price. Callers enforce authorization.
    pub fn update_price(&mut self, id: AssetId, new_price: Amount) -> Result<(), MarketError> {
        self.get_mut(id)?.price = new_price;
        Ok(())
    }

    /// Sets the listed flag. Callers keep the Listing Index in step.
    pub fn set_listed(&mut self, id: AssetId, listed: bool) -> Result<(), MarketError> {
        self.get_mut(id)?.is_listed = listed;
        Ok(())
    }

    /// Sets the denormalized owner. Callers keep the Owner Index and the
    /// registry in step.
    pub fn set_owner(&mut self, id: AssetId, owner: Address) -> Result<(), MarketError> {
        self.get_mut(id)?.owner = owner;
        Ok(())
    }

    /// Iterates all records in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records.values()
    }

    /// Number of minted assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been minted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Undoes the most recent `create` when the registry refused issuance.
    ///
    /// Only the latest allocation can be rolled back; the aborted mint never
    /// becomes observable, so its ID is reused by the next mint.
    pub(crate) fn rollback_create(&mut self, id: AssetId) {
        if id.as_u64() == self.last_id && self.records.remove(&id).is_some() {
            self.last_id -= 1;
        }
    }

    fn get_mut(&mut self, id: AssetId) -> Result<&mut AssetRecord, MarketError> {
        self.records.get_mut(&id).ok_or(MarketError::NotFound(id))
    }
}

// =============================================================================
// TESTS
// =============================================================================
