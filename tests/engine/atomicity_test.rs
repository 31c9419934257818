// Commit-or-discard boundary tests
//
// Every mutating call lands entirely or not at all, so a precondition that
// fires part-way through a multi-step flow must leave no trace.

use crowdmint::engine::{EngineConfig, EngineError, SaleEngine};
use crowdmint::identity::Address;
use crowdmint::sale::Round;

/// Funded engine with a started pre-sale (rate 1_000, cap 10) and a
/// whitelisted buyer
fn capped_engine() -> (SaleEngine, Address, Address) {
    let owner = Address::from_label("owner");
    let buyer = Address::from_label("buyer");
    let config = EngineConfig::new(
        owner,
        Address::from_label("admin"),
        Address::from_label("fund"),
    )
    .with_total_supply(1_000_000)
    .with_sale_allocation(400_000);

    let mut engine = SaleEngine::new(config).unwrap();
    engine.fund_sale(owner, 0).unwrap();
    engine.add_to_whitelist(owner, buyer).unwrap();
    engine
        .set_up_sale(owner, Round::PreSale, [0; 3], 1_000)
        .unwrap();
    engine.start_sale(owner, 10).unwrap();
    (engine, owner, buyer)
}

// ============================================================================
// FAILED-OPERATION ROLLBACK TESTS
// ============================================================================

#[test]
fn test_cap_failure_rolls_back_escrow_movement() {
    let (mut engine, _, buyer) = capped_engine();

    engine.purchase(buyer, 7).unwrap();
    let escrow_before = engine.sale_balance();
    let buyer_before = engine.balance_of(buyer);

    // The escrow transfer happens before the cap check inside the draft;
    // the failure must discard it
    let result = engine.purchase(buyer, 4);
    assert!(matches!(result, Err(EngineError::Sale(_))));

    assert_eq!(engine.sale_balance(), escrow_before);
    assert_eq!(engine.balance_of(buyer), buyer_before);
    assert_eq!(engine.raised(), 7);
    assert_eq!(engine.forwarded_total(), 7);
    assert_eq!(engine.receipts().len(), 1);
}

#[test]
fn test_failed_operation_leaves_snapshot_untouched() {
    let (mut engine, _, buyer) = capped_engine();
    engine.purchase(buyer, 7).unwrap();

    let before = engine.to_bytes();
    let result = engine.purchase(buyer, 4);
    assert!(result.is_err());

    assert_eq!(engine.to_bytes(), before);
}

#[test]
fn test_failed_operation_emits_no_events() {
    let (mut engine, _, buyer) = capped_engine();

    // Drain the setup events
    engine.poll_events();

    let result = engine.purchase(buyer, 11);
    assert!(result.is_err());
    assert_eq!(engine.pending_events(), 0);

    engine.purchase(buyer, 1).unwrap();
    // TokensPurchased plus FundsForwarded
    assert_eq!(engine.pending_events(), 2);
}

#[test]
fn test_failed_fund_sale_moves_nothing() {
    let owner = Address::from_label("owner");
    let config = EngineConfig::new(
        owner,
        Address::from_label("admin"),
        Address::from_label("fund"),
    )
    .with_total_supply(100)
    .with_sale_allocation(100);

    let mut engine = SaleEngine::new(config).unwrap();
    engine.poll_events();

    // 100 into escrow leaves the owner at zero; a repeat attempt must
    // change nothing and emit nothing
    engine.fund_sale(owner, 0).unwrap();
    engine.poll_events();

    let result = engine.fund_sale(owner, 50);
    assert!(matches!(result, Err(EngineError::SaleAlreadyFunded)));
    assert_eq!(engine.sale_balance(), 100);
    assert_eq!(engine.balance_of(owner), 0);
    assert_eq!(engine.pending_events(), 0);
}

#[test]
fn test_failed_transfer_keeps_balances() {
    let (mut engine, owner, buyer) = capped_engine();
    engine.purchase(buyer, 5).unwrap();
    engine.lock_account(owner, buyer, 5_000).unwrap();
    engine.set_transfer_enabled(owner, true).unwrap();

    let alice = Address::from_label("alice");
    let before_total = engine.total_balance();

    let result = engine.transfer(buyer, alice, 1_000);
    assert!(result.is_err());

    assert_eq!(engine.balance_of(buyer), 5_000);
    assert_eq!(engine.balance_of(alice), 0);
    assert_eq!(engine.total_balance(), before_total);
}

// ============================================================================
// BATCH ATOMICITY TESTS
// ============================================================================

#[test]
fn test_failing_batch_grant_discards_every_grant() {
    let (mut engine, owner, _) = capped_engine();
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");

    engine
        .add_many_allocations(owner, &[(alice, 100), (bob, 100)])
        .unwrap();
    engine.poll_events();

    let snapshot = engine.to_bytes();
    let result = engine.allocate_tokens_to_many(owner, &[(alice, 100), (bob, 101)]);

    assert!(result.is_err());
    assert_eq!(engine.balance_of(alice), 0);
    assert_eq!(engine.remaining_allocation(alice), 100);
    assert_eq!(engine.pending_events(), 0);
    assert_eq!(engine.to_bytes(), snapshot);
}

#[test]
fn test_successful_batch_grant_emits_one_event_per_grant() {
    let (mut engine, owner, _) = capped_engine();
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");

    engine
        .add_many_allocations(owner, &[(alice, 100), (bob, 100)])
        .unwrap();
    engine.poll_events();

    engine
        .allocate_tokens_to_many(owner, &[(alice, 40), (bob, 60)])
        .unwrap();

    assert_eq!(engine.pending_events(), 2);
    assert_eq!(engine.balance_of(alice), 40);
    assert_eq!(engine.balance_of(bob), 60);
}

// ============================================================================
// EVENT DELIVERY TESTS
// ============================================================================

#[test]
fn test_poll_drains_the_queue_once() {
    let (mut engine, _, buyer) = capped_engine();
    engine.poll_events();

    engine.purchase(buyer, 1).unwrap();

    let first = engine.poll_events();
    assert_eq!(first.len(), 2);

    let second = engine.poll_events();
    assert!(second.is_empty());
}
