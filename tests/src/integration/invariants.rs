//! # Invariant Audits
//!
//! Drives the engine through scripted and randomized operation sequences and
//! audits the book at every quiescent point: listing consistency, ownership
//! indexing, and agreement between the denormalized owner and the registry.

#[cfg(test)]
mod tests {
    use market_engine::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    const OPERATOR: u8 = 0xff;

    /// Asserts the denormalized owner matches the registry for every minted
    /// asset.
    async fn assert_registry_sync(
        market: &Marketplace<InMemoryRegistry, InMemoryBank, RecordingEvents>,
        registry: &InMemoryRegistry,
        minted: &[AssetId],
    ) {
        for &id in minted {
            let record = market.nft_details(id).await.expect("minted record");
            let authoritative = registry.current_owner(id).await.expect("issued asset");
            assert_eq!(
                record.owner, authoritative,
                "denormalized owner diverged for {id}"
            );
        }
    }

    #[tokio::test]
    async fn minting_n_assets_yields_n_distinct_ids() {
        let (market, _registry, _bank, _events) = create_test_service(addr(OPERATOR));
        let owner = addr(1);

        let mut ids = Vec::new();
        for n in 0..12u64 {
            let id = market
                .mint(owner, owner, format!("uri:{n}"), 100 + u128::from(n), format!("prompt {n}"))
                .await
                .unwrap();
            ids.push(id);
        }

        let mut held: Vec<_> = market.nfts_of(owner).await.iter().map(|r| r.id).collect();
        held.sort();
        ids.sort();
        assert_eq!(held, ids);
        assert_eq!(held.len(), 12);
        assert!(market.audit().await.is_clean());
    }

    #[tokio::test]
    async fn listing_enumeration_matches_flags() {
        let (market, _registry, _bank, _events) = create_test_service(addr(OPERATOR));
        let owner = addr(1);

        let mut listed = Vec::new();
        for n in 0..6u64 {
            let id = market
                .mint(owner, owner, format!("uri:{n}"), 100, "p".into())
                .await
                .unwrap();
            if n % 2 == 0 {
                market.sell_nft(owner, id, 100).await.unwrap();
                listed.push(id);
            }
        }

        let mut enumerated: Vec<_> = market.marketplace_nfts().await.iter().map(|r| r.id).collect();
        enumerated.sort();
        assert_eq!(enumerated, listed);
        for record in market.marketplace_nfts().await {
            assert!(record.is_listed);
        }
        assert!(market.audit().await.is_clean());
    }

    #[tokio::test]
    async fn randomized_operation_sequence_stays_consistent() {
        let (market, registry, _bank, _events) = create_test_service(addr(OPERATOR));
        let actors: Vec<Address> = (1u8..=4).map(addr).collect();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut minted: Vec<AssetId> = Vec::new();

        for step in 0..200 {
            let actor = actors[rng.gen_range(0..actors.len())];
            match rng.gen_range(0..5) {
                0 => {
                    let id = market
                        .mint(
                            actor,
                            actor,
                            format!("uri:{step}"),
                            rng.gen_range(1..10_000),
                            format!("prompt {step}"),
                        )
                        .await
                        .expect("mint never hits a precondition here");
                    minted.push(id);
                }
                1 if !minted.is_empty() => {
                    let id = minted[rng.gen_range(0..minted.len())];
                    // May fail NotOwner or AlreadyListed; both leave state intact.
                    let _ = market.sell_nft(actor, id, rng.gen_range(1..10_000)).await;
                }
                2 if !minted.is_empty() => {
                    let id = minted[rng.gen_range(0..minted.len())];
                    let _ = market.cancel_listing(actor, id).await;
                }
                3 if !minted.is_empty() => {
                    let id = minted[rng.gen_range(0..minted.len())];
                    let _ = market.buy_nft(actor, id, rng.gen_range(1..20_000)).await;
                }
                4 if !minted.is_empty() => {
                    let id = minted[rng.gen_range(0..minted.len())];
                    let _ = market.update_price(actor, id, rng.gen_range(1..10_000)).await;
                }
                _ => {}
            }

            let report = market.audit().await;
            assert!(
                report.is_clean(),
                "violations after step {step}: {:?}",
                report.violations
            );
        }

        assert_registry_sync(&market, &registry, &minted).await;

        // The run actually exercised the interesting paths.
        let stats = market.stats().await;
        assert!(stats.minted > 0);
        assert!(stats.sales_settled > 0);
        assert!(stats.failed_operations > 0);
    }

    #[tokio::test]
    async fn registry_sync_after_each_operation_kind() {
        let (market, registry, _bank, _events) = create_test_service(addr(OPERATOR));
        let (seller, buyer) = (addr(1), addr(2));

        let id = market
            .mint(seller, seller, "uri".into(), 1000, "prompt".into())
            .await
            .unwrap();
        assert_registry_sync(&market, &registry, &[id]).await;

        market.sell_nft(seller, id, 1000).await.unwrap();
        assert_registry_sync(&market, &registry, &[id]).await;

        market.update_price(seller, id, 1500).await.unwrap();
        assert_registry_sync(&market, &registry, &[id]).await;

        market.cancel_listing(seller, id).await.unwrap();
        market.sell_nft(seller, id, 1500).await.unwrap();
        assert_registry_sync(&market, &registry, &[id]).await;

        market.buy_nft(buyer, id, 1500).await.unwrap();
        assert_registry_sync(&market, &registry, &[id]).await;
    }

    #[tokio::test]
    async fn serialized_concurrent_buyers_settle_exactly_one() {
        let (market, registry, bank, _events) = create_test_service(addr(OPERATOR));
        let seller = addr(1);
        let id = market
            .mint(seller, seller, "uri".into(), 1000, "prompt".into())
            .await
            .unwrap();
        market.sell_nft(seller, id, 1000).await.unwrap();

        let mut handles = Vec::new();
        for n in 2..=6u8 {
            let market = Arc::clone(&market);
            handles.push(tokio::spawn(async move {
                market.buy_nft(addr(n), id, 1000).await
            }));
        }

        let mut settled = 0;
        for handle in handles {
            if handle.await.expect("task").is_ok() {
                settled += 1;
            }
        }

        assert_eq!(settled, 1);
        assert_eq!(bank.balance(seller).await, 975);
        assert_eq!(bank.balance(addr(OPERATOR)).await, 25);
        let winner = registry.current_owner(id).await.unwrap();
        assert_eq!(market.nft_details(id).await.unwrap().owner, winner);
        assert!(market.audit().await.is_clean());
    }
}
