//! Reserve orientation and price derivation.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::mock_chain::{token, MockChain, MockEvents, WAD};
use crate::chain::RawReserves;
use crate::reserve_tracker::{orient, ReserveTracker};
use crate::types::{PairPath, PairReserves};

// WETH (0xC02a...) sorts after DAI (0x6B17...), USDC (0xA0b8...) and
// UNI (0x1f98...), so a WETH-from path over any of those pools is flipped.

#[test]
fn orient_maps_flipped_pair_onto_from_and_to_roles() {
    let path = PairPath { from: token("WETH"), to: token("DAI") };
    assert!(path.flipped());

    // Slot 0 belongs to DAI, the lower address.
    let raw = RawReserves { reserve0: 200_000 * WAD, reserve1: 100 * WAD };
    let oriented = orient(raw, &path);

    assert_eq!(oriented.reserve_from, Decimal::from(100));
    assert_eq!(oriented.reserve_to, Decimal::from(200_000));
}

#[test]
fn orient_is_symmetric_for_the_reversed_path() {
    let path = PairPath { from: token("DAI"), to: token("WETH") };
    assert!(!path.flipped());

    let raw = RawReserves { reserve0: 200_000 * WAD, reserve1: 100 * WAD };
    let oriented = orient(raw, &path);

    assert_eq!(oriented.reserve_from, Decimal::from(200_000));
    assert_eq!(oriented.reserve_to, Decimal::from(100));
}

#[test]
fn orient_scales_each_slot_by_its_own_token_decimals() {
    // USDC has 6 decimals and occupies slot 0 of the WETH/USDC pool.
    let path = PairPath { from: token("WETH"), to: token("USDC") };
    assert!(path.flipped());

    let raw = RawReserves { reserve0: 200_000 * 1_000_000, reserve1: 100 * WAD };
    let oriented = orient(raw, &path);

    assert_eq!(oriented.reserve_from, Decimal::from(100));
    assert_eq!(oriented.reserve_to, Decimal::from(200_000));
}

#[test]
fn price_is_derived_in_both_directions() {
    let reserves = PairReserves {
        reserve_from: Decimal::from(100),
        reserve_to: Decimal::from(200_000),
    };
    let price = reserves.price().expect("both reserves non-zero");

    assert_eq!(price.to_per_from, Decimal::from(2000));
    assert_eq!(price.from_per_to, Decimal::new(5, 4));
}

#[test]
fn price_is_undefined_when_either_reserve_is_zero() {
    let empty_from = PairReserves {
        reserve_from: Decimal::ZERO,
        reserve_to: Decimal::from(200_000),
    };
    let empty_to = PairReserves {
        reserve_from: Decimal::from(100),
        reserve_to: Decimal::ZERO,
    };

    assert_eq!(empty_from.price(), None);
    assert_eq!(empty_to.price(), None);
}

#[tokio::test(start_paused = true)]
async fn cancelling_a_subscription_closes_the_stream() {
    let chain = Arc::new(MockChain::new());
    let events = Arc::new(MockEvents::new());
    let path = PairPath { from: token("WETH"), to: token("DAI") };
    let pair = chain.add_pool(path.from.address, 100 * WAD, path.to.address, 200_000 * WAD);
    let tracker = ReserveTracker::new(chain, events.clone());
    let (tx, _rx) = mpsc::unbounded_channel();

    let handle = tracker.subscribe(pair, path, 1, tx).await.unwrap();
    assert_eq!(events.live_subscriptions(pair), 1);

    handle.cancel();
    // Give the runtime a pass to collect the aborted drain task.
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(events.live_subscriptions(pair), 0);
}

#[test]
fn reserves_near_the_pool_ceiling_stay_representable() {
    // Uniswap pools cap each reserve at 2^112 - 1.
    let raw = (1u128 << 112) - 1;
    let path = PairPath { from: token("DAI"), to: token("WETH") };
    let oriented = orient(RawReserves { reserve0: raw, reserve1: raw }, &path);

    assert!(oriented.reserve_from > Decimal::from_scientific("5.1e15").unwrap());
    assert_eq!(oriented.reserve_from, oriented.reserve_to);
    assert!(oriented.price().is_some());
}
