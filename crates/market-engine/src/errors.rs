//! # Error Types
//!
//! All error taxonomies for the marketplace engine. Every variant is a
//! precondition or collaborator failure; operations abort whole with no
//! partial effect, and nothing is retried internally.

use crate::domain::value_objects::{Address, Amount, AssetId};
use thiserror::Error;

// =============================================================================
// MARKET ERRORS
// =============================================================================

/// Errors surfaced to marketplace callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// Referenced asset was never minted.
    #[error("asset not found: {0}")]
    NotFound(AssetId),

    /// Caller is not the asset's current registry owner.
    #[error("caller {caller} is not the owner ({owner})")]
    NotOwner {
        /// The rejected caller.
        caller: Address,
        /// The registry's current owner.
        owner: Address,
    },

    /// Asset is already listed for sale.
    #[error("asset already listed: {0}")]
    AlreadyListed(AssetId),

    /// Asset is not listed for sale.
    #[error("asset not listed: {0}")]
    NotListed(AssetId),

    /// Payment below the asking price.
    #[error("insufficient funds: required {required}, offered {offered}")]
    InsufficientFunds {
        /// The asking price.
        required: Amount,
        /// The amount the buyer supplied.
        offered: Amount,
    },

    /// Buyer is already the owner.
    #[error("self purchase by {0}")]
    SelfPurchase(Address),

    /// Marketplace is paused.
    #[error("marketplace is paused")]
    Paused,

    /// Asset ID counter overflowed. Unreachable in practice.
    #[error("asset ID space exhausted")]
    IdSpaceExhausted,

    /// Asset Registry collaborator failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Payment channel collaborator failed; the operation was unwound.
    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),
}

impl MarketError {
    /// Returns true if the error is a precondition rejection, evaluated
    /// before any mutation (as opposed to a collaborator failure).
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        !matches!(self, Self::Registry(_) | Self::Payment(_))
    }
}

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Errors from the Asset Registry collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Registry has no such asset.
    #[error("registry has no asset {0}")]
    UnknownAsset(AssetId),

    /// Transfer named a `from` that is not the current owner.
    #[error("transfer from {claimed} rejected: current owner is {actual}")]
    NotCurrentOwner {
        /// Owner named by the transfer.
        claimed: Address,
        /// Owner on record.
        actual: Address,
    },

    /// Issue attempted for an ID the registry already tracks.
    #[error("asset already issued: {0}")]
    AlreadyIssued(AssetId),

    /// Registry unreachable or internally failed.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// PAYMENT ERRORS
// =============================================================================

/// Errors from the payment channel collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// A credit to a recipient was rejected.
    #[error("transfer of {amount} to {to} rejected: {reason}")]
    TransferRejected {
        /// Intended recipient.
        to: Address,
        /// Amount in the smallest currency unit.
        amount: Amount,
        /// Collaborator-supplied reason.
        reason: String,
    },

    /// Payment channel unreachable or internally failed.
    #[error("payment channel unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// TESTS
// =============================================================================
