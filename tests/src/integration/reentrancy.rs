//! # Reentrancy Tests
//!
//! Adversarial payment channel whose fund-receipt callback calls back into
//! the engine mid-settlement. Checks-effects-interactions means every such
//! attempt must observe fully-committed state: the asset is no longer
//! listed, so a reentrant purchase is rejected and nothing is paid twice.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use market_engine::prelude::*;
    use parking_lot::Mutex;
    use std::sync::{Arc, Weak};

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    const OPERATOR: u8 = 0xff;

    type Engine = Marketplace<InMemoryRegistry, ReentrantChannel, RecordingEvents>;

    /// What the callback does when the watched recipient is credited.
    #[derive(Clone, Copy, Debug)]
    enum Attack {
        /// Re-enter `buy_nft` for the same asset as another buyer.
        Rebuy { buyer: Address, payment: Amount },
        /// Re-enter `cancel_listing` as the original seller.
        Cancel { caller: Address },
        /// Re-enter `sell_nft` for the same asset (legitimate for the buyer,
        /// who owns it by callback time).
        Relist { caller: Address, price: Amount },
    }

    /// Payment channel that re-enters the engine from inside `disburse`.
    ///
    /// Wraps [`InMemoryBank`]; the first credit to `watched` triggers the
    /// configured attack before the batch is applied, exactly like a
    /// malicious recipient running code in its fund-receipt hook.
    struct ReentrantChannel {
        inner: InMemoryBank,
        watched: Address,
        engine: Mutex<Option<Weak<Engine>>>,
        armed: Mutex<Option<(AssetId, Attack)>>,
        outcomes: Mutex<Vec<Result<(), MarketError>>>,
    }

    impl ReentrantChannel {
        fn new(watched: Address) -> Self {
            Self {
                inner: InMemoryBank::new(),
                watched,
                engine: Mutex::new(None),
                armed: Mutex::new(None),
                outcomes: Mutex::new(Vec::new()),
            }
        }

        fn bind(&self, engine: Weak<Engine>) {
            *self.engine.lock() = Some(engine);
        }

        fn arm(&self, id: AssetId, attack: Attack) {
            *self.armed.lock() = Some((id, attack));
        }

        fn outcomes(&self) -> Vec<Result<(), MarketError>> {
            self.outcomes.lock().clone()
        }

        async fn balance(&self, account: Address) -> Amount {
            self.inner.balance(account).await
        }

        async fn reject_credits_to(&self, account: Address) {
            self.inner.reject_credits_to(account).await;
        }

        async fn accept_credits_to(&self, account: Address) {
            self.inner.accept_credits_to(account).await;
        }

        fn engine_handle(&self) -> Option<Arc<Engine>> {
            self.engine.lock().as_ref().and_then(Weak::upgrade)
        }
    }

    #[async_trait]
    impl PaymentChannel for ReentrantChannel {
        async fn disburse(&self, payouts: &[Payout]) -> Result<(), PaymentError> {
            let triggered = payouts.iter().any(|payout| payout.to == self.watched);
            if triggered {
                let armed = self.armed.lock().take();
                if let (Some((id, attack)), Some(engine)) = (armed, self.engine_handle()) {
                    let outcome = match attack {
                        Attack::Rebuy { buyer, payment } => {
                            engine.buy_nft(buyer, id, payment).await
                        }
                        Attack::Cancel { caller } => engine.cancel_listing(caller, id).await,
                        Attack::Relist { caller, price } => {
                            engine.sell_nft(caller, id, price).await.map(|_| ())
                        }
                    };
                    self.outcomes.lock().push(outcome);
                }
            }
            self.inner.disburse(payouts).await
        }
    }

    /// Engine wired to the reentrant channel, with one listed asset.
    async fn rigged_market(
        seller: Address,
        price: Amount,
    ) -> (Arc<Engine>, Arc<InMemoryRegistry>, Arc<ReentrantChannel>, AssetId) {
        let registry = Arc::new(InMemoryRegistry::new());
        let channel = Arc::new(ReentrantChannel::new(seller));
        let events = Arc::new(RecordingEvents::new());
        let market = Arc::new(Marketplace::new(
            Arc::clone(&registry),
            Arc::clone(&channel),
            events,
            ServiceConfig::with_operator(addr(OPERATOR)),
        ));
        channel.bind(Arc::downgrade(&market));

        let id = market
            .mint(seller, seller, "uri".into(), price, "prompt".into())
            .await
            .unwrap();
        market.sell_nft(seller, id, price).await.unwrap();
        (market, registry, channel, id)
    }

    #[tokio::test]
    async fn reentrant_rebuy_fails_and_pays_once() {
        let (seller, buyer, attacker) = (addr(1), addr(2), addr(3));
        let (market, registry, channel, id) = rigged_market(seller, 1000).await;
        channel.arm(
            id,
            Attack::Rebuy {
                buyer: attacker,
                payment: 5000,
            },
        );

        market.buy_nft(buyer, id, 1000).await.expect("outer buy");

        // The callback ran and was rejected: the asset was already delisted.
        assert_eq!(channel.outcomes(), vec![Err(MarketError::NotListed(id))]);

        // Exactly one settlement: one ownership move, one commission, no
        // duplicate proceeds.
        assert_eq!(registry.current_owner(id).await.unwrap(), buyer);
        assert_eq!(channel.balance(seller).await, 975);
        assert_eq!(channel.balance(addr(OPERATOR)).await, 25);
        assert_eq!(channel.balance(attacker).await, 0);
        assert!(market.audit().await.is_clean());
    }

    #[tokio::test]
    async fn reentrant_cancel_sees_committed_delisting() {
        let (seller, buyer) = (addr(1), addr(2));
        let (market, registry, channel, id) = rigged_market(seller, 1000).await;
        channel.arm(id, Attack::Cancel { caller: seller });

        market.buy_nft(buyer, id, 1000).await.expect("outer buy");

        // By callback time the asset is delisted AND owned by the buyer;
        // the seller's cancel is rejected on the listing precondition.
        assert_eq!(channel.outcomes(), vec![Err(MarketError::NotListed(id))]);
        assert_eq!(registry.current_owner(id).await.unwrap(), buyer);
        assert!(!market.nft_details(id).await.unwrap().is_listed);
        assert!(market.audit().await.is_clean());
    }

    #[tokio::test]
    async fn refund_callback_cannot_rebuy_either() {
        // Watch the buyer: the attack fires from the refund credit instead
        // of the seller's proceeds.
        let (seller, buyer) = (addr(1), addr(2));
        let registry = Arc::new(InMemoryRegistry::new());
        let channel = Arc::new(ReentrantChannel::new(buyer));
        let events = Arc::new(RecordingEvents::new());
        let market = Arc::new(Marketplace::new(
            Arc::clone(&registry),
            Arc::clone(&channel),
            events,
            ServiceConfig::with_operator(addr(OPERATOR)),
        ));
        channel.bind(Arc::downgrade(&market));

        let id = market
            .mint(seller, seller, "uri".into(), 1000, "prompt".into())
            .await
            .unwrap();
        market.sell_nft(seller, id, 1000).await.unwrap();
        channel.arm(
            id,
            Attack::Rebuy {
                buyer: addr(3),
                payment: 5000,
            },
        );

        market.buy_nft(buyer, id, 1300).await.expect("outer buy");

        assert_eq!(channel.outcomes(), vec![Err(MarketError::NotListed(id))]);
        assert_eq!(channel.balance(buyer).await, 300);
        assert_eq!(channel.balance(seller).await, 975);
        assert_eq!(registry.current_owner(id).await.unwrap(), buyer);
    }

    #[tokio::test]
    async fn relist_during_failed_disbursement_unwinds_cleanly() {
        // Worst case for the unwind: the buyer owns the asset by callback
        // time, so their reentrant relist is legitimate and succeeds — and
        // then the payout batch fails, forcing the engine to roll the whole
        // settlement back over the relisted state.
        let (seller, buyer) = (addr(1), addr(2));
        let (market, registry, channel, id) = rigged_market(seller, 1000).await;
        channel.arm(
            id,
            Attack::Relist {
                caller: buyer,
                price: 2000,
            },
        );
        channel.reject_credits_to(seller).await;

        let err = market.buy_nft(buyer, id, 1000).await.unwrap_err();
        assert!(matches!(err, MarketError::Payment(_)));

        // The callback itself went through; the abort must undo it too.
        assert_eq!(channel.outcomes(), vec![Ok(())]);

        // Ownership and the full pre-settlement listing are restored.
        assert_eq!(registry.current_owner(id).await.unwrap(), seller);
        let record = market.nft_details(id).await.unwrap();
        assert_eq!(record.owner, seller);
        assert!(record.is_listed);
        assert_eq!(record.price, 1000);

        // Exactly one listing entry, indices back on the seller, no funds
        // moved.
        let listed: Vec<_> = market.marketplace_nfts().await.iter().map(|r| r.id).collect();
        assert_eq!(listed, vec![id]);
        assert_eq!(market.nfts_of(seller).await.len(), 1);
        assert!(market.nfts_of(buyer).await.is_empty());
        assert_eq!(channel.balance(seller).await, 0);
        assert_eq!(channel.balance(buyer).await, 0);
        assert!(market.audit().await.is_clean());

        // Once payments recover the restored listing settles normally.
        channel.accept_credits_to(seller).await;
        market.buy_nft(buyer, id, 1000).await.expect("retry buy");
        assert_eq!(registry.current_owner(id).await.unwrap(), buyer);
        assert_eq!(channel.balance(seller).await, 975);
    }
}
