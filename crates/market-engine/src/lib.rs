//! # Market Engine - Prompt-NFT Marketplace
//!
//! ## Purpose
//!
//! Marketplace engine for uniquely-owned digital assets carrying a
//! generative-art prompt as metadata. Supports minting, listing, purchase,
//! cancellation, and price updates with an escrow-free atomic
//! transfer-plus-payment settlement and a flat 2.5% commission on every sale.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Listing consistency: `is_listed` iff exactly one Listing Index entry | `domain/invariants.rs` - `check_listing_invariant()` |
//! | INVARIANT-2 | Ownership indexing: each ID under exactly its owner's entry | `domain/invariants.rs` - `check_ownership_invariant()` |
//! | INVARIANT-3 | Denormalized owner equals the registry's record | every mutating path in `service.rs`, verified in `tests/` |
//! | INVARIANT-4 | No partial settlement: operations commit whole or unwind whole | `service.rs` - `buy_inner()` / `unwind_settlement()` |
//!
//! ## Reentrancy Defense
//!
//! Settlement follows checks-effects-interactions: all preconditions are
//! validated and all book mutations committed before any fund crosses the
//! payment boundary. A payment-channel callback that re-enters `buy_nft`
//! for the same asset observes `is_listed == false` and is rejected.
//!
//! ## External Collaborators (outbound ports)
//!
//! | Collaborator | Trait | Purpose |
//! |--------------|-------|---------|
//! | Asset Registry | `AssetRegistry` | Identity issuance, exclusive-ownership transfer |
//! | Payment substrate | `PaymentChannel` | Atomic fund disbursement |
//! | Notification log | `EventSink` | Minted / Purchase / PriceUpdate / NftListStatus |
//!
//! ## Usage Example
//!
//! ```ignore
//! use market_engine::prelude::*;
//!
//! let (market, _registry, bank, _events) = create_test_service(operator);
//! let id = market.mint(artist, artist, uri, 1000, prompt).await?;
//! market.sell_nft(artist, id, 1000).await?;
//! market.buy_nft(collector, id, 1000).await?;
//! assert_eq!(bank.balance(artist).await, 975);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{AssetRecord, SaleSplit, COMMISSION_DIVISOR};

    // Value objects
    pub use crate::domain::value_objects::{Address, Amount, AssetId};

    // Bookkeeping structures
    pub use crate::domain::book::MarketBook;
    pub use crate::domain::listing_index::ListingIndex;
    pub use crate::domain::owner_index::OwnerIndex;
    pub use crate::domain::store::AssetRecordStore;

    // Invariants
    pub use crate::domain::invariants::{audit, InvariantReport, InvariantViolation};

    // Ports
    pub use crate::ports::inbound::MarketplaceApi;
    pub use crate::ports::outbound::{AssetRegistry, EventSink, PaymentChannel, Payout};

    // Events
    pub use crate::events::{EventEnvelope, MarketEvent};

    // Errors
    pub use crate::errors::{MarketError, PaymentError, RegistryError};

    // Adapters
    pub use crate::adapters::{InMemoryBank, InMemoryRegistry, RecordingEvents, TracingEvents};

    // Service
    pub use crate::service::{
        create_test_service, MarketStats, Marketplace, ServiceConfig,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
