//! # In-Memory Bank
//!
//! Reference implementation of the [`PaymentChannel`] port: a balance map
//! with per-recipient rejection injection for exercising the engine's
//! settlement-unwind path.

use crate::domain::value_objects::{Address, Amount};
use crate::errors::PaymentError;
use crate::ports::outbound::{PaymentChannel, Payout};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Balance-map payment channel.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    balances: RwLock<HashMap<Address, Amount>>,
    rejecting: RwLock<HashSet<Address>>,
}

impl InMemoryBank {
    /// Creates a bank with all balances at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance of `account`.
    pub async fn balance(&self, account: Address) -> Amount {
        self.balances
            .read()
            .await
            .get(&account)
            .copied()
            .unwrap_or(0)
    }

    /// Makes every future credit to `account` fail with `TransferRejected`.
    pub async fn reject_credits_to(&self, account: Address) {
        self.rejecting.write().await.insert(account);
    }

    /// Clears a rejection set by [`Self::reject_credits_to`].
    pub async fn accept_credits_to(&self, account: Address) {
        self.rejecting.write().await.remove(&account);
    }
}

#[async_trait]
impl PaymentChannel for InMemoryBank {
    async fn disburse(&self, payouts: &[Payout]) -> Result<(), PaymentError> {
        // Reject before applying anything: a failed batch leaves no credit.
        let rejecting = self.rejecting.read().await;
        for payout in payouts {
            if rejecting.contains(&payout.to) {
                return Err(PaymentError::TransferRejected {
                    to: payout.to,
                    amount: payout.amount,
                    reason: "recipient rejected the credit".into(),
                });
            }
        }
        drop(rejecting);

        let mut balances = self.balances.write().await;
        for payout in payouts {
            let balance = balances.entry(payout.to).or_insert(0);
            *balance = balance.saturating_add(payout.amount);
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
