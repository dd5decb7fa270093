//! # Driving Ports (Inbound)
//!
//! The API callers drive the marketplace through. Caller identity is an
//! explicit [`Address`] argument; the execution substrate authenticates it
//! before the call reaches the engine.

use crate::domain::entities::AssetRecord;
use crate::domain::value_objects::{Address, Amount, AssetId};
use crate::errors::MarketError;
use async_trait::async_trait;

// =============================================================================
// MARKETPLACE API
// =============================================================================

/// Public marketplace operations.
///
/// Every mutating operation is atomic: it either completes fully or aborts
/// with no observable partial effect.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Mints a new asset to `to` and returns its ID.
    ///
    /// # Errors
    ///
    /// `Paused`; registry failures are propagated and unwind the mint.
    async fn mint(
        &self,
        caller: Address,
        to: Address,
        uri: String,
        price: Amount,
        prompt: String,
    ) -> Result<AssetId, MarketError>;

    /// Lists `id` for sale at `price`. Returns true on success.
    ///
    /// When `price` differs from the stored price a `PriceUpdate` is emitted
    /// before the listing notification.
    ///
    /// # Errors
    ///
    /// `Paused`, `NotFound`, `NotOwner`, `AlreadyListed`.
    async fn sell_nft(
        &self,
        caller: Address,
        id: AssetId,
        price: Amount,
    ) -> Result<bool, MarketError>;

    /// Withdraws the listing for `id`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `NotOwner`, `NotListed`.
    async fn cancel_listing(&self, caller: Address, id: AssetId) -> Result<(), MarketError>;

    /// Purchases `id`, paying `payment` (the substrate-supplied amount).
    ///
    /// Settlement is checks-effects-interactions: all state effects commit
    /// before any fund leaves the engine, so a reentrant purchase of the
    /// same asset fails `NotListed`.
    ///
    /// # Errors
    ///
    /// `Paused`, `NotFound`, `NotListed`, `InsufficientFunds`,
    /// `SelfPurchase`; payment failures unwind the whole operation.
    async fn buy_nft(
        &self,
        buyer: Address,
        id: AssetId,
        payment: Amount,
    ) -> Result<(), MarketError>;

    /// Changes the asking price of `id`, listed or not. Returns true on
    /// success and emits `PriceUpdate` unconditionally.
    ///
    /// # Errors
    ///
    /// `NotFound`, `NotOwner`.
    async fn update_price(
        &self,
        caller: Address,
        id: AssetId,
        price: Amount,
    ) -> Result<bool, MarketError>;

    /// All currently-listed assets. Order is stable within a single read.
    async fn marketplace_nfts(&self) -> Vec<AssetRecord>;

    /// All assets held by `owner`, in no particular order.
    async fn nfts_of(&self, owner: Address) -> Vec<AssetRecord>;

    /// Full record for `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` for unminted IDs.
    async fn nft_details(&self, id: AssetId) -> Result<AssetRecord, MarketError>;
}
