//! # In-Memory Asset Registry
//!
//! Reference implementation of the [`AssetRegistry`] port: a map from asset
//! ID to current owner with exclusive-ownership semantics.

use crate::domain::value_objects::{Address, AssetId};
use crate::errors::RegistryError;
use crate::ports::outbound::AssetRegistry;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Map-backed ownership ledger.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    owners: RwLock<HashMap<AssetId, Address>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of issued assets.
    pub async fn issued_count(&self) -> usize {
        self.owners.read().await.len()
    }
}

#[async_trait]
impl AssetRegistry for InMemoryRegistry {
    async fn issue(&self, to: Address, id: AssetId) -> Result<(), RegistryError> {
        let mut owners = self.owners.write().await;
        if owners.contains_key(&id) {
            return Err(RegistryError::AlreadyIssued(id));
        }
        owners.insert(id, to);
        Ok(())
    }

    async fn transfer(&self, from: Address, to: Address, id: AssetId) -> Result<(), RegistryError> {
        let mut owners = self.owners.write().await;
        let current = owners
            .get(&id)
            .copied()
            .ok_or(RegistryError::UnknownAsset(id))?;
        if current != from {
            return Err(RegistryError::NotCurrentOwner {
                claimed: from,
                actual: current,
            });
        }
        owners.insert(id, to);
        Ok(())
    }

    async fn current_owner(&self, id: AssetId) -> Result<Address, RegistryError> {
        self.owners
            .read()
            .await
            .get(&id)
            .copied()
            .ok_or(RegistryError::UnknownAsset(id))
    }

    async fn exists(&self, id: AssetId) -> Result<bool, RegistryError> {
        Ok(self.owners.read().await.contains_key(&id))
    }
}

// =============================================================================
// TESTS
// =============================================================================
