//! # Driven Ports (Outbound)
//!
//! Interfaces the marketplace engine depends on. External adapters implement
//! these traits to provide:
//! - Unique-identity issuance and exclusive-ownership transfer (Asset Registry)
//! - Fund disbursement (Payment Channel)
//! - Notification delivery (Event Sink)
//!
//! The registry and payment channel are trusted collaborators, but payment
//! credits may re-enter the engine before returning (a recipient's
//! fund-receipt callback can call back into any engine operation). The
//! engine commits all state effects before crossing the payment boundary.

use crate::domain::value_objects::{Address, Amount, AssetId};
use crate::errors::{PaymentError, RegistryError};
use crate::events::EventEnvelope;
use async_trait::async_trait;

// =============================================================================
// ASSET REGISTRY
// =============================================================================

/// The ownership ledger: authoritative record of who holds each asset.
///
/// The engine's `AssetRecord.owner` field is a denormalized copy of this
/// record; authorization checks always consult the registry, never the copy.
#[async_trait]
pub trait AssetRegistry: Send + Sync {
    /// Issues a freshly minted asset to `to`.
    ///
    /// # Errors
    ///
    /// `AlreadyIssued` if the registry already tracks `id`.
    async fn issue(&self, to: Address, id: AssetId) -> Result<(), RegistryError>;

    /// Transfers exclusive ownership of `id` from `from` to `to`.
    ///
    /// Must complete, or fail with no effect, before the engine moves any
    /// funds for the corresponding sale.
    ///
    /// # Errors
    ///
    /// `UnknownAsset` if `id` was never issued; `NotCurrentOwner` if `from`
    /// does not hold the asset.
    async fn transfer(&self, from: Address, to: Address, id: AssetId) -> Result<(), RegistryError>;

    /// Returns the current owner of `id`.
    ///
    /// # Errors
    ///
    /// `UnknownAsset` if `id` was never issued.
    async fn current_owner(&self, id: AssetId) -> Result<Address, RegistryError>;

    /// Returns true if the registry tracks `id`.
    async fn exists(&self, id: AssetId) -> Result<bool, RegistryError>;
}

// =============================================================================
// PAYMENT CHANNEL
// =============================================================================

/// One credit within a settlement batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    /// Recipient account.
    pub to: Address,
    /// Amount in the smallest currency unit.
    pub amount: Amount,
}

/// Fund disbursement to sellers, the operator, and refunded buyers.
///
/// A credit may trigger arbitrary recipient code before returning, including
/// reentrant calls into the engine. Implementations carry the substrate's
/// transaction atomicity: a batch either applies every payout or fails with
/// none applied.
#[async_trait]
pub trait PaymentChannel: Send + Sync {
    /// Applies a settlement batch atomically, in order.
    ///
    /// # Errors
    ///
    /// `TransferRejected` or `Unavailable`; no payout of the batch remains
    /// applied, and the engine unwinds the whole operation.
    async fn disburse(&self, payouts: &[Payout]) -> Result<(), PaymentError>;

    /// Credits a single recipient. Convenience over [`Self::disburse`].
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::disburse`].
    async fn credit(&self, to: Address, amount: Amount) -> Result<(), PaymentError> {
        self.disburse(&[Payout { to, amount }]).await
    }
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Observer boundary for marketplace notifications.
///
/// Delivery is fire-and-forget: sinks must not fail the emitting operation.
pub trait EventSink: Send + Sync {
    /// Delivers one wrapped event to observers.
    fn publish(&self, envelope: EventEnvelope);
}
