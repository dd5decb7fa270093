//! # Marketplace Service
//!
//! The engine behind every public operation: authorization against the Asset
//! Registry, book mutation, commission split, and fund disbursement.
//!
//! ## Atomicity
//!
//! The book sits behind one `tokio::sync::Mutex`, so each operation's
//! mutations commit as a unit. Settlement follows checks-effects-interactions:
//! preconditions, then registry transfer, then book commit, and only after the
//! lock is released does any fund cross the payment boundary. A reentrant
//! `buy_nft` for the same asset therefore observes `is_listed == false` and
//! fails its precondition check.
//!
//! ## Unwind
//!
//! A payment failure after the book has committed triggers a compensating
//! unwind: ownership transfers back through the registry and the record,
//! listing, and indices are restored. No partial settlement is observable.

use crate::domain::book::MarketBook;
use crate::domain::entities::{AssetRecord, SaleSplit};
use crate::domain::invariants::{self, InvariantReport};
use crate::domain::value_objects::{Address, Amount, AssetId};
use crate::errors::MarketError;
use crate::events::{EventEnvelope, MarketEvent};
use crate::ports::inbound::MarketplaceApi;
use crate::ports::outbound::{AssetRegistry, EventSink, PaymentChannel, Payout};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// CONFIG & STATS
// =============================================================================

/// Marketplace service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Account receiving the commission on every sale.
    pub operator: Address,
}

impl ServiceConfig {
    /// Config with the given operator account.
    #[must_use]
    pub fn with_operator(operator: Address) -> Self {
        Self { operator }
    }
}

/// Running counters for the marketplace.
#[derive(Debug, Default, Clone)]
pub struct MarketStats {
    /// Assets minted.
    pub minted: u64,
    /// Listings opened (including relists).
    pub listings_opened: u64,
    /// Listings withdrawn by their owner.
    pub listings_cancelled: u64,
    /// Sales settled.
    pub sales_settled: u64,
    /// Sum of sale prices across settled sales.
    pub gross_volume: Amount,
    /// Commission collected by the operator.
    pub commission_collected: Amount,
    /// Operations rejected or unwound.
    pub failed_operations: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// The marketplace engine.
///
/// Generic over its collaborators so the test suite can bind adversarial
/// adapters (reentrant payment channels, rejecting banks) to the same engine
/// that production code binds to real substrates.
pub struct Marketplace<R, P, E>
where
    R: AssetRegistry,
    P: PaymentChannel,
    E: EventSink,
{
    config: ServiceConfig,
    book: Mutex<MarketBook>,
    registry: Arc<R>,
    payments: Arc<P>,
    events: Arc<E>,
    paused: AtomicBool,
    stats: Mutex<MarketStats>,
}

impl<R, P, E> Marketplace<R, P, E>
where
    R: AssetRegistry,
    P: PaymentChannel,
    E: EventSink,
{
    /// Creates an engine over the given collaborators.
    pub fn new(registry: Arc<R>, payments: Arc<P>, events: Arc<E>, config: ServiceConfig) -> Self {
        Self {
            config,
            book: Mutex::new(MarketBook::new()),
            registry,
            payments,
            events,
            paused: AtomicBool::new(false),
            stats: Mutex::new(MarketStats::default()),
        }
    }

    /// Pauses or resumes mint, listing, and purchase. Who may flip this gate
    /// is the substrate's concern, not the engine's.
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
        info!(paused, "Marketplace pause gate changed");
    }

    /// Returns true while the pause gate is set.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Current counters.
    pub async fn stats(&self) -> MarketStats {
        self.stats.lock().await.clone()
    }

    /// Audits the book against the domain invariants.
    pub async fn audit(&self) -> InvariantReport {
        let book = self.book.lock().await;
        invariants::audit(&book)
    }

    fn ensure_not_paused(&self) -> Result<(), MarketError> {
        if self.is_paused() {
            Err(MarketError::Paused)
        } else {
            Ok(())
        }
    }

    fn emit(&self, event: MarketEvent) {
        self.events.publish(EventEnvelope::wrap(event, now()));
    }

    async fn note_failure(&self) {
        self.stats.lock().await.failed_operations += 1;
    }

    /// Authorizes `caller` against the registry's current owner. The
    /// denormalized record copy is never consulted for authorization.
    async fn ensure_registry_owner(
        &self,
        caller: Address,
        id: AssetId,
    ) -> Result<Address, MarketError> {
        let owner = self.registry.current_owner(id).await?;
        if caller != owner {
            return Err(MarketError::NotOwner { caller, owner });
        }
        Ok(owner)
    }

    async fn mint_inner(
        &self,
        to: Address,
        uri: String,
        price: Amount,
        prompt: String,
    ) -> Result<AssetId, MarketError> {
        self.ensure_not_paused()?;

        let mut book = self.book.lock().await;
        let id = book
            .store
            .create(uri.clone(), to, price, prompt.clone(), now())?;

        // Issue before indexing: a registry refusal unwinds only the record.
        if let Err(err) = self.registry.issue(to, id).await {
            book.store.rollback_create(id);
            return Err(err.into());
        }
        book.owners.add(to, id);
        drop(book);

        self.stats.lock().await.minted += 1;
        self.emit(MarketEvent::Minted {
            minter: to,
            price,
            id,
            uri,
            prompt,
        });
        Ok(id)
    }

    async fn sell_inner(
        &self,
        caller: Address,
        id: AssetId,
        price: Amount,
    ) -> Result<bool, MarketError> {
        self.ensure_not_paused()?;

        let mut book = self.book.lock().await;
        let record = book.store.get(id)?;
        let old_price = record.price;
        let already_listed = record.is_listed;
        let owner = self.ensure_registry_owner(caller, id).await?;
        if already_listed {
            return Err(MarketError::AlreadyListed(id));
        }

        if price != old_price {
            book.store.update_price(id, price)?;
            self.emit(MarketEvent::PriceUpdate {
                owner,
                old_price,
                new_price: price,
                id,
            });
        }
        book.store.set_listed(id, true)?;
        book.listings.add(id);
        drop(book);

        self.stats.lock().await.listings_opened += 1;
        self.emit(MarketEvent::NftListStatus {
            owner,
            id,
            is_listed: true,
        });
        Ok(true)
    }

    async fn cancel_inner(&self, caller: Address, id: AssetId) -> Result<(), MarketError> {
        let mut book = self.book.lock().await;
        let listed = book.store.get(id)?.is_listed;
        let owner = self.ensure_registry_owner(caller, id).await?;
        if !listed {
            return Err(MarketError::NotListed(id));
        }

        book.store.set_listed(id, false)?;
        book.listings.remove(id);
        drop(book);

        self.stats.lock().await.listings_cancelled += 1;
        self.emit(MarketEvent::NftListStatus {
            owner,
            id,
            is_listed: false,
        });
        Ok(())
    }

    async fn update_price_inner(
        &self,
        caller: Address,
        id: AssetId,
        price: Amount,
    ) -> Result<bool, MarketError> {
        let mut book = self.book.lock().await;
        let old_price = book.store.get(id)?.price;
        let owner = self.ensure_registry_owner(caller, id).await?;
        book.store.update_price(id, price)?;
        drop(book);

        self.emit(MarketEvent::PriceUpdate {
            owner,
            old_price,
            new_price: price,
            id,
        });
        Ok(true)
    }

    async fn buy_inner(
        &self,
        buyer: Address,
        id: AssetId,
        payment: Amount,
    ) -> Result<(), MarketError> {
        self.ensure_not_paused()?;

        // --- Checks, then effects, all under the book lock -------------------
        let mut book = self.book.lock().await;
        let record = book.store.get(id)?;
        if !record.is_listed {
            return Err(MarketError::NotListed(id));
        }
        let sale_price = record.price;
        let uri = record.uri.clone();

        let seller = self.registry.current_owner(id).await?;
        if buyer == seller {
            return Err(MarketError::SelfPurchase(buyer));
        }
        if payment < sale_price {
            return Err(MarketError::InsufficientFunds {
                required: sale_price,
                offered: payment,
            });
        }

        // Ownership moves first; a registry refusal aborts with no mutation.
        self.registry.transfer(seller, buyer, id).await?;

        book.store.set_owner(id, buyer)?;
        book.store.set_listed(id, false)?;
        book.listings.remove(id);
        book.owners.remove(seller, id);
        book.owners.add(buyer, id);
        drop(book);

        debug!(id = %id, seller = %seller, buyer = %buyer, sale_price, "Settlement committed, disbursing");

        // --- Interactions: funds move only after the commit above ------------
        let split = SaleSplit::of(sale_price);
        let mut payouts = Vec::with_capacity(3);
        if split.proceeds > 0 {
            payouts.push(Payout {
                to: seller,
                amount: split.proceeds,
            });
        }
        if split.commission > 0 {
            payouts.push(Payout {
                to: self.config.operator,
                amount: split.commission,
            });
        }
        if payment > sale_price {
            payouts.push(Payout {
                to: buyer,
                amount: payment - sale_price,
            });
        }

        if let Err(payment_err) = self.payments.disburse(&payouts).await {
            warn!(id = %id, error = %payment_err, "Disbursement failed, unwinding settlement");
            self.unwind_settlement(seller, id, sale_price).await;
            return Err(payment_err.into());
        }

        let mut stats = self.stats.lock().await;
        stats.sales_settled += 1;
        stats.gross_volume = stats.gross_volume.saturating_add(sale_price);
        stats.commission_collected = stats.commission_collected.saturating_add(split.commission);
        drop(stats);

        self.emit(MarketEvent::Purchase {
            previous_owner: seller,
            new_owner: buyer,
            price: sale_price,
            id,
            uri,
        });
        Ok(())
    }

    /// Compensating unwind after a disbursement failure: returns the asset
    /// to its pre-settlement state (seller owns it, listed once at the sale
    /// price).
    ///
    /// A payment callback may have re-entered the engine before the batch
    /// failed and mutated the asset further (e.g. the buyer relisting it).
    /// Those mutations were built on the settlement being aborted, so the
    /// restore works from the book's current state rather than assuming the
    /// post-commit shape: the current holder is read back from the registry
    /// and the book, and the listing entry is never double-inserted.
    async fn unwind_settlement(&self, seller: Address, id: AssetId, sale_price: Amount) {
        let mut book = self.book.lock().await;

        match self.registry.current_owner(id).await {
            Ok(holder) if holder != seller => {
                if let Err(err) = self.registry.transfer(holder, seller, id).await {
                    // Trusted collaborator refused the reversal; the book is
                    // restored anyway and the divergence is surfaced loudly.
                    error!(id = %id, error = %err, "Registry refused settlement reversal");
                }
            }
            Ok(_) => {}
            Err(err) => {
                error!(id = %id, error = %err, "Registry unreadable during unwind");
            }
        }

        let recorded_owner = match book.store.get(id) {
            Ok(record) => record.owner,
            Err(_) => {
                error!(id = %id, "Record vanished during unwind");
                return;
            }
        };
        book.owners.remove(recorded_owner, id);
        if !book.owners.holds(seller, id) {
            book.owners.add(seller, id);
        }

        let restored = book
            .store
            .set_owner(id, seller)
            .and_then(|()| book.store.set_listed(id, true))
            .and_then(|()| book.store.update_price(id, sale_price));
        if restored.is_err() {
            error!(id = %id, "Record vanished during unwind");
            return;
        }
        if !book.listings.contains(id) {
            book.listings.add(id);
        }
    }
}

// =============================================================================
// API IMPLEMENTATION
// =============================================================================

#[async_trait]
impl<R, P, E> MarketplaceApi for Marketplace<R, P, E>
where
    R: AssetRegistry,
    P: PaymentChannel,
    E: EventSink,
{
    #[instrument(skip(self, uri, prompt), fields(to = %to, price))]
    async fn mint(
        &self,
        _caller: Address,
        to: Address,
        uri: String,
        price: Amount,
        prompt: String,
    ) -> Result<AssetId, MarketError> {
        match self.mint_inner(to, uri, price, prompt).await {
            Ok(id) => {
                info!(id = %id, "Minted asset");
                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, "Mint rejected");
                self.note_failure().await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, id = %id, price))]
    async fn sell_nft(
        &self,
        caller: Address,
        id: AssetId,
        price: Amount,
    ) -> Result<bool, MarketError> {
        match self.sell_inner(caller, id, price).await {
            Ok(listed) => {
                info!("Asset listed");
                Ok(listed)
            }
            Err(err) => {
                warn!(error = %err, "Listing rejected");
                self.note_failure().await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, id = %id))]
    async fn cancel_listing(&self, caller: Address, id: AssetId) -> Result<(), MarketError> {
        match self.cancel_inner(caller, id).await {
            Ok(()) => {
                info!("Listing cancelled");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Cancel rejected");
                self.note_failure().await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self), fields(buyer = %buyer, id = %id, payment))]
    async fn buy_nft(
        &self,
        buyer: Address,
        id: AssetId,
        payment: Amount,
    ) -> Result<(), MarketError> {
        match self.buy_inner(buyer, id, payment).await {
            Ok(()) => {
                info!("Sale settled");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Purchase rejected");
                self.note_failure().await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, id = %id, price))]
    async fn update_price(
        &self,
        caller: Address,
        id: AssetId,
        price: Amount,
    ) -> Result<bool, MarketError> {
        match self.update_price_inner(caller, id, price).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                warn!(error = %err, "Price update rejected");
                self.note_failure().await;
                Err(err)
            }
        }
    }

    async fn marketplace_nfts(&self) -> Vec<AssetRecord> {
        let book = self.book.lock().await;
        book.listings
            .iter()
            .filter_map(|id| book.store.get(id).ok())
            .cloned()
            .collect()
    }

    async fn nfts_of(&self, owner: Address) -> Vec<AssetRecord> {
        let book = self.book.lock().await;
        book.owners
            .holdings(owner)
            .iter()
            .filter_map(|&id| book.store.get(id).ok())
            .cloned()
            .collect()
    }

    async fn nft_details(&self, id: AssetId) -> Result<AssetRecord, MarketError> {
        let book = self.book.lock().await;
        book.store.get(id).cloned()
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Builds an engine wired to the in-memory adapters. Test and demo helper.
#[must_use]
pub fn create_test_service(
    operator: Address,
) -> (
    Arc<
        Marketplace<
            crate::adapters::InMemoryRegistry,
            crate::adapters::InMemoryBank,
            crate::adapters::RecordingEvents,
        >,
    >,
    Arc<crate::adapters::InMemoryRegistry>,
    Arc<crate::adapters::InMemoryBank>,
    Arc<crate::adapters::RecordingEvents>,
) {
    let registry = Arc::new(crate::adapters::InMemoryRegistry::new());
    let bank = Arc::new(crate::adapters::InMemoryBank::new());
    let events = Arc::new(crate::adapters::RecordingEvents::new());
    let service = Arc::new(Marketplace::new(
        Arc::clone(&registry),
        Arc::clone(&bank),
        Arc::clone(&events),
        ServiceConfig::with_operator(operator),
    ));
    (service, registry, bank, events)
}

// =============================================================================
// TESTS
// =============================================================================
