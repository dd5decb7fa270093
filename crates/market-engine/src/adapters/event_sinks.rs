//! # Event Sinks
//!
//! Implementations of the [`EventSink`] port: a recording sink for tests and
//! observability assertions, and a tracing sink that logs each notification.

use crate::events::{EventEnvelope, MarketEvent};
use crate::ports::outbound::EventSink;
use std::sync::Mutex;
use tracing::info;

// =============================================================================
// RECORDING SINK
// =============================================================================

/// Collects every published envelope in order.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    published: Mutex<Vec<EventEnvelope>>,
}

impl RecordingEvents {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything published so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EventEnvelope> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }

    /// Drains and returns everything published so far.
    #[must_use]
    pub fn take(&self) -> Vec<EventEnvelope> {
        self.published
            .lock()
            .map(|mut published| std::mem::take(&mut *published))
            .unwrap_or_default()
    }
}

impl EventSink for RecordingEvents {
    fn publish(&self, envelope: EventEnvelope) {
        if let Ok(mut published) = self.published.lock() {
            published.push(envelope);
        }
    }
}

// =============================================================================
// TRACING SINK
// =============================================================================

/// Logs each notification at info level and drops it.
#[derive(Debug, Default)]
pub struct TracingEvents;

impl EventSink for TracingEvents {
    fn publish(&self, envelope: EventEnvelope) {
        match &envelope.event {
            MarketEvent::Minted { minter, id, price, .. } => {
                info!(event_id = %envelope.event_id, minter = %minter, id = %id, price, "Minted");
            }
            MarketEvent::Purchase {
                previous_owner,
                new_owner,
                id,
                price,
                ..
            } => {
                info!(
                    event_id = %envelope.event_id,
                    seller = %previous_owner,
                    buyer = %new_owner,
                    id = %id,
                    price,
                    "Purchase"
                );
            }
            MarketEvent::PriceUpdate {
                owner,
                old_price,
                new_price,
                id,
            } => {
                info!(
                    event_id = %envelope.event_id,
                    owner = %owner,
                    id = %id,
                    old_price,
                    new_price,
                    "PriceUpdate"
                );
            }
            MarketEvent::NftListStatus { owner, id, is_listed } => {
                info!(
                    event_id = %envelope.event_id,
                    owner = %owner,
                    id = %id,
                    is_listed,
                    "NftListStatus"
                );
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
