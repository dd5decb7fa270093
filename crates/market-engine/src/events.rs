//! # Market Notifications
//!
//! Events emitted for observers. Nothing in the engine consumes them: they
//! exist for off-engine indexers, UIs, and the test suite. Each event is
//! wrapped in an envelope carrying a correlation ID and emission timestamp.

use crate::domain::value_objects::{Address, Amount, AssetId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// EVENTS
// =============================================================================

/// Notification emitted by a marketplace operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// A new asset was minted.
    Minted {
        /// Account the asset was issued to.
        minter: Address,
        /// Initial asking price.
        price: Amount,
        /// Allocated asset ID.
        id: AssetId,
        /// Metadata URI.
        uri: String,
        /// Generative-art prompt.
        prompt: String,
    },
    /// A sale settled.
    Purchase {
        /// Seller before settlement.
        previous_owner: Address,
        /// Buyer after settlement.
        new_owner: Address,
        /// Sale price (before commission split).
        price: Amount,
        /// Asset sold.
        id: AssetId,
        /// Metadata URI.
        uri: String,
    },
    /// An asking price changed.
    PriceUpdate {
        /// Owner who changed the price.
        owner: Address,
        /// Price before the change.
        old_price: Amount,
        /// Price after the change.
        new_price: Amount,
        /// Asset repriced.
        id: AssetId,
    },
    /// An asset was listed or delisted.
    NftListStatus {
        /// Owner at the time of the change.
        owner: Address,
        /// Asset affected.
        id: AssetId,
        /// New listing state.
        is_listed: bool,
    },
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Transport wrapper for an emitted event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Correlation ID for observers that need request/event matching.
    pub event_id: Uuid,
    /// Emission timestamp (unix seconds).
    pub emitted_at: u64,
    /// The event itself.
    pub event: MarketEvent,
}

impl EventEnvelope {
    /// Wraps an event with a fresh correlation ID.
    #[must_use]
    pub fn wrap(event: MarketEvent, emitted_at: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            emitted_at,
            event,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
