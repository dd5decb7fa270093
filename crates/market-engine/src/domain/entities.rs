//! # Core Domain Entities
//!
//! Main business entities for the marketplace: the per-asset record and the
//! settlement split computed on every sale.

use crate::domain::value_objects::{Address, Amount, AssetId};
use serde::{Deserialize, Serialize};

// =============================================================================
// ASSET RECORD
// =============================================================================

/// One record per minted asset.
///
/// `uri`, `prompt`, and `created_at` are immutable after mint. `owner` is a
/// denormalized copy of the Asset Registry's authoritative record; every
/// operation that moves ownership updates both in the same committed step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Unique asset identifier (1-based, never reused).
    pub id: AssetId,
    /// Metadata URI. Immutable after mint.
    pub uri: String,
    /// Denormalized current owner. Authoritative copy lives in the registry.
    pub owner: Address,
    /// Asking price in the smallest currency unit.
    pub price: Amount,
    /// Whether the asset is currently listed for sale.
    pub is_listed: bool,
    /// Generative-art prompt carried as metadata. Immutable after mint.
    pub prompt: String,
    /// Creation timestamp (unix seconds). Immutable after mint.
    pub created_at: u64,
}

// =============================================================================
// SALE SPLIT
// =============================================================================

/// Flat commission divisor: `price / 40` is 2.5% of the sale price.
pub const COMMISSION_DIVISOR: Amount = 40;

/// Outcome of splitting a sale price between seller and operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSplit {
    /// Amount disbursed to the seller.
    pub proceeds: Amount,
    /// Amount disbursed to the marketplace operator.
    pub commission: Amount,
}

impl SaleSplit {
    /// Splits a sale price into seller proceeds and operator commission.
    ///
    /// Commission is `floor(price / 40)`; the truncated remainder stays with
    /// the seller. Intentional seller-favoring rounding, not a precision bug.
    #[must_use]
    pub const fn of(sale_price: Amount) -> Self {
        let commission = sale_price / COMMISSION_DIVISOR;
        Self {
            proceeds: sale_price - commission,
            commission,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
