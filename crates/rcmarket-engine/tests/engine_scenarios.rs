//! End-to-end scenarios for the resource engine
//!
//! These run the engine against real stores and check the guarantees block
//! producers rely on: all-or-nothing settlement, repeatable queries, and
//! convergence of idle markets.

use proptest::prelude::*;
use rcmarket_core::{
    MarketBudget, MarketBudgets, MarketError, MarketsState, ResourceConsumption, ResourceKind,
    ResourceParameters, REFERENCE_TOTAL_SUPPLY,
};
use rcmarket_engine::{
    FixedSupply, ResourceEngine, StaticCaller, SwitchableCaller, MARKETS_KEY,
};
use rcmarket_storage::{FileStore, MemoryStore, ObjectStore};
use std::sync::Arc;

type TestEngine = ResourceEngine<Arc<MemoryStore>, Arc<SwitchableCaller>, FixedSupply>;

fn engine() -> (TestEngine, Arc<MemoryStore>, Arc<SwitchableCaller>) {
    let store = Arc::new(MemoryStore::new());
    let caller = Arc::new(SwitchableCaller::new(StaticCaller::kernel()));
    let engine = ResourceEngine::new(
        store.clone(),
        caller.clone(),
        FixedSupply::new(REFERENCE_TOTAL_SUPPLY),
    );
    (engine, store, caller)
}

fn stored_markets(engine: &TestEngine) -> Option<Vec<u8>> {
    engine
        .store()
        .get_object(engine.space(), MARKETS_KEY)
        .unwrap()
}

mod atomicity {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn over_limit_block_leaves_state_untouched(
            over in 0usize..3,
            excess in 1u64..1_000_000,
            fractions in prop::array::uniform3(0u64..=100),
        ) {
            let (engine, _, _) = engine();
            prop_assert!(engine.consume_block_resources(100, 100, 100));
            let before = stored_markets(&engine);

            let markets = engine.get_resource_markets().unwrap();
            let consumption = ResourceConsumption::from_fn(|kind| {
                let market = markets.get(kind);
                let i = kind as usize;
                if i == over {
                    market.block_limit + excess
                } else {
                    market.block_limit / 100 * fractions[i]
                }
            });

            let err = engine.try_consume_block_resources(consumption).unwrap_err();
            let is_exhausted = matches!(err, MarketError::ResourceExhausted { .. });
            prop_assert!(is_exhausted);
            prop_assert_eq!(before, stored_markets(&engine));
        }
    }

    #[test]
    fn supply_bound_rejects_even_below_block_limit() {
        let (engine, _, caller) = engine();
        caller.set(StaticCaller::operator());

        engine
            .set_resource_markets_parameters(MarketBudgets::from_fn(|_| MarketBudget {
                block_budget: 0,
                block_limit: u64::MAX,
            }))
            .unwrap();
        let before = stored_markets(&engine);

        let supply = engine.get_resource_markets().unwrap().network_bandwidth.resource_supply;
        assert!(!engine.consume_block_resources(0, supply, 0));
        assert_eq!(before, stored_markets(&engine));

        assert!(engine.consume_block_resources(0, supply - 1, 0));
        let markets = engine.get_resource_markets().unwrap();
        assert_eq!(markets.network_bandwidth.resource_supply, 1);
    }
}

mod queries {
    use super::*;

    #[test]
    fn limits_are_idempotent() {
        let (engine, store, caller) = engine();
        assert!(engine.consume_block_resources(4_096, 65_536, 1_000_000));

        let before = store.len();
        caller.set(StaticCaller::user());
        let first = engine.get_resource_limits().unwrap();
        let second = engine.get_resource_limits().unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.get_resource_markets().unwrap(), engine.get_resource_markets().unwrap());
        assert_eq!(store.len(), before);
    }

    #[test]
    fn consumption_raises_price() {
        let (engine, _, _) = engine();
        let params = ResourceParameters::default()
            .with_formula(rcmarket_core::CurveFormula::ConstantProduct);
        let governance = ResourceEngine::new(
            engine.store().clone(),
            StaticCaller::governance(),
            FixedSupply::new(REFERENCE_TOTAL_SUPPLY),
        );
        governance.set_resource_parameters(params).unwrap();

        let before = engine.get_resource_limits().unwrap();
        for _ in 0..20 {
            let limits = engine.get_resource_limits().unwrap();
            assert!(engine.consume_block_resources(
                limits.disk_storage.limit,
                limits.network_bandwidth.limit,
                limits.compute_bandwidth.limit,
            ));
        }
        let after = engine.get_resource_limits().unwrap();

        for kind in ResourceKind::ALL {
            assert!(after.get(kind).cost > before.get(kind).cost, "{kind} did not get dearer");
        }
    }
}

mod dynamics {
    use super::*;

    #[test]
    fn idle_blocks_converge_to_steady_state() {
        let (engine, _, caller) = engine();
        caller.set(StaticCaller::operator());

        let params = ResourceParameters::default().with_decay(u64::MAX / 100).unwrap();
        engine.set_resource_parameters(params.clone()).unwrap();
        engine
            .set_resource_markets_parameters(MarketBudgets::from_fn(|_| MarketBudget {
                block_budget: 1_000,
                block_limit: 500,
            }))
            .unwrap();

        for _ in 0..5_000 {
            assert!(engine.consume_block_resources(0, 0, 0));
        }

        let target = params.max_resources(1_000);
        for (kind, market) in engine.get_resource_markets().unwrap().iter() {
            assert!(
                market.resource_supply.abs_diff(target) <= target / 100,
                "{kind}: supply {} vs steady state {target}",
                market.resource_supply
            );
        }
    }

    #[test]
    fn phantom_rc_tracks_token_supply() {
        let store = Arc::new(MemoryStore::new());
        let rich = ResourceEngine::new(store.clone(), StaticCaller::kernel(), FixedSupply::new(REFERENCE_TOTAL_SUPPLY));
        assert!(rich.consume_block_resources(0, 0, 0));
        let rich_reserve = rich.get_resource_markets().unwrap().disk_storage.rc_reserve;

        let poor = ResourceEngine::new(Arc::new(MemoryStore::new()), StaticCaller::kernel(), FixedSupply::new(0));
        assert!(poor.consume_block_resources(0, 0, 0));
        let poor_reserve = poor.get_resource_markets().unwrap().disk_storage.rc_reserve;

        let params = ResourceParameters::default();
        assert_eq!(
            rich_reserve - poor_reserve,
            params.print_rate(REFERENCE_TOTAL_SUPPLY).unwrap()
        );
    }
}

mod persistence {
    use super::*;

    #[test]
    fn file_backed_engine_resumes() {
        let dir = tempfile::tempdir().unwrap();

        let first = ResourceEngine::new(
            FileStore::open(dir.path()).unwrap(),
            StaticCaller::kernel(),
            FixedSupply::new(REFERENCE_TOTAL_SUPPLY),
        );
        assert!(first.consume_block_resources(1_000, 0, 0));
        let expected = first.get_resource_markets().unwrap();
        drop(first);

        let second = ResourceEngine::new(
            FileStore::open(dir.path()).unwrap(),
            StaticCaller::user(),
            FixedSupply::new(REFERENCE_TOTAL_SUPPLY),
        );
        assert_eq!(second.get_resource_markets().unwrap(), expected);
        assert_ne!(expected, MarketsState::initial());
    }
}
