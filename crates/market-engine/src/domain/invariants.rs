//! # Domain Invariants
//!
//! Consistency conditions that MUST hold over the market book at every
//! quiescent point:
//!
//! - INVARIANT-1: Listing consistency — `is_listed == true` iff the ID
//!   appears exactly once in the Listing Index.
//! - INVARIANT-2: Ownership indexing — every record's ID appears exactly once
//!   under its owner in the Owner Index, and under no other owner.
//!
//! Registry/denormalized-owner agreement is checked in integration tests
//! against a registry adapter; it cannot be audited from the book alone.

use crate::domain::book::MarketBook;
use crate::domain::value_objects::{Address, AssetId};
use std::collections::HashMap;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// A single detected inconsistency between the store and an index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A record has `is_listed == true` but the Listing Index disagrees, or
    /// the ID appears more than once.
    ListingMismatch {
        /// Offending asset.
        id: AssetId,
        /// Value of the record's flag.
        flagged: bool,
        /// Occurrences in the Listing Index.
        occurrences: usize,
    },
    /// The Listing Index holds an ID with no minted record.
    DanglingListing {
        /// Offending asset.
        id: AssetId,
    },
    /// A record's ID is missing from, duplicated in, or under the wrong
    /// owner in the Owner Index.
    OwnershipMismatch {
        /// Offending asset.
        id: AssetId,
        /// Owner recorded in the store.
        owner: Address,
        /// Occurrences under that owner.
        occurrences: usize,
    },
    /// The Owner Index holds an ID under an owner that does not match the
    /// record, or an ID with no minted record.
    StrayHolding {
        /// Offending asset.
        id: AssetId,
        /// Owner whose entry holds the ID.
        holder: Address,
    },
}

/// Result of a full invariant audit.
#[derive(Clone, Debug, Default)]
pub struct InvariantReport {
    /// All detected violations. Empty means the book is consistent.
    pub violations: Vec<InvariantViolation>,
}

impl InvariantReport {
    /// Returns true if no violation was detected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

// =============================================================================
// CHECKS
// =============================================================================

/// INVARIANT-1: Listing consistency.
#[must_use]
pub fn check_listing_invariant(book: &MarketBook) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let mut occurrences: HashMap<AssetId, usize> = HashMap::new();
    for id in book.listings.iter() {
        *occurrences.entry(id).or_insert(0) += 1;
        if !book.store.exists(id) {
            violations.push(InvariantViolation::DanglingListing { id });
        }
    }

    for record in book.store.iter() {
        let seen = occurrences.get(&record.id).copied().unwrap_or(0);
        let expected = usize::from(record.is_listed);
        if seen != expected {
            violations.push(InvariantViolation::ListingMismatch {
                id: record.id,
                flagged: record.is_listed,
                occurrences: seen,
            });
        }
    }

    violations
}

/// INVARIANT-2: Ownership indexing.
#[must_use]
pub fn check_ownership_invariant(book: &MarketBook) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for record in book.store.iter() {
        let seen = book
            .owners
            .holdings(record.owner)
            .iter()
            .filter(|&&id| id == record.id)
            .count();
        if seen != 1 {
            violations.push(InvariantViolation::OwnershipMismatch {
                id: record.id,
                owner: record.owner,
                occurrences: seen,
            });
        }
    }

    for (holder, ids) in book.owners.iter() {
        for &id in ids {
            let stray = match book.store.get(id) {
                Ok(record) => record.owner != *holder,
                Err(_) => true,
            };
            if stray {
                violations.push(InvariantViolation::StrayHolding { id, holder: *holder });
            }
        }
    }

    violations
}

/// Runs every book-local invariant check.
#[must_use]
pub fn audit(book: &MarketBook) -> InvariantReport {
    let mut violations = check_listing_invariant(book);
    violations.extend(check_ownership_invariant(book));
    InvariantReport { violations }
}

// =============================================================================
// TESTS
// =============================================================================
