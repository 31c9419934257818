// Authority boundary tests for every privileged engine operation

use crowdmint::engine::{EngineConfig, EngineError, SaleEngine};
use crowdmint::identity::Address;
use crowdmint::ledger::LedgerError;
use crowdmint::sale::{AllocationError, Round, SaleError, WhitelistError};

fn engine() -> (SaleEngine, Address, Address) {
    let owner = Address::from_label("owner");
    let admin = Address::from_label("admin");
    let config = EngineConfig::new(owner, admin, Address::from_label("fund"))
        .with_total_supply(1_000_000)
        .with_sale_allocation(400_000);
    (SaleEngine::new(config).unwrap(), owner, admin)
}

// ============================================================================
// OWNER-ONLY OPERATIONS
// ============================================================================

#[test]
fn test_ledger_controls_reject_non_owner() {
    let (mut engine, _, admin) = engine();
    let mallory = Address::from_label("mallory");

    for caller in [admin, mallory] {
        assert!(matches!(
            engine.set_transfer_enabled(caller, true),
            Err(EngineError::Ledger(LedgerError::Unauthorized))
        ));
        assert!(matches!(
            engine.lock_account(caller, mallory, 10),
            Err(EngineError::Ledger(LedgerError::Unauthorized))
        ));
        assert!(matches!(
            engine.unlock_account(caller, mallory),
            Err(EngineError::Ledger(LedgerError::Unauthorized))
        ));
        assert!(matches!(
            engine.set_admin(caller, mallory),
            Err(EngineError::Ledger(LedgerError::Unauthorized))
        ));
    }

    assert!(!engine.transfer_enabled());
    assert_eq!(engine.admin(), admin);
}

#[test]
fn test_sale_lifecycle_rejects_non_owner() {
    let (mut engine, owner, admin) = engine();

    assert!(matches!(
        engine.fund_sale(admin, 0),
        Err(EngineError::Ledger(LedgerError::Unauthorized))
    ));
    assert!(matches!(
        engine.set_up_sale(admin, Round::PreSale, [0; 3], 100),
        Err(EngineError::Sale(SaleError::Unauthorized))
    ));

    engine
        .set_up_sale(owner, Round::PreSale, [0; 3], 100)
        .unwrap();
    assert!(matches!(
        engine.start_sale(admin, 0),
        Err(EngineError::Sale(SaleError::Unauthorized))
    ));

    engine.start_sale(owner, 0).unwrap();
    assert!(matches!(
        engine.end_sale(admin),
        Err(EngineError::Sale(SaleError::Unauthorized))
    ));
}

#[test]
fn test_gate_registries_reject_non_owner() {
    let (mut engine, _, admin) = engine();
    let alice = Address::from_label("alice");

    assert!(matches!(
        engine.add_to_whitelist(admin, alice),
        Err(EngineError::Whitelist(WhitelistError::Unauthorized))
    ));
    assert!(matches!(
        engine.add_many_to_whitelist(admin, &[alice]),
        Err(EngineError::Whitelist(WhitelistError::Unauthorized))
    ));
    assert!(matches!(
        engine.remove_from_whitelist(admin, alice),
        Err(EngineError::Whitelist(WhitelistError::Unauthorized))
    ));
    assert!(matches!(
        engine.add_allocation(admin, alice, 100),
        Err(EngineError::Allocation(AllocationError::Unauthorized))
    ));
    assert!(matches!(
        engine.remove_allocation(admin, alice),
        Err(EngineError::Allocation(AllocationError::Unauthorized))
    ));
    assert!(matches!(
        engine.allocate_tokens(admin, alice, 10),
        Err(EngineError::Allocation(AllocationError::Unauthorized))
    ));

    assert_eq!(engine.whitelist_size(), 0);
    assert_eq!(engine.remaining_allocation(alice), 0);
}

// ============================================================================
// ADMIN-ONLY OPERATIONS
// ============================================================================

#[test]
fn test_admin_transfer_rejects_owner_and_strangers() {
    let (mut engine, owner, admin) = engine();
    let alice = Address::from_label("alice");

    assert!(matches!(
        engine.admin_transfer(owner, owner, alice, 100),
        Err(EngineError::Ledger(LedgerError::Unauthorized))
    ));
    assert!(matches!(
        engine.admin_transfer(alice, owner, alice, 100),
        Err(EngineError::Ledger(LedgerError::Unauthorized))
    ));

    engine.admin_transfer(admin, owner, alice, 100).unwrap();
    assert_eq!(engine.balance_of(alice), 100);
}

#[test]
fn test_admin_reassignment_switches_rights() {
    let (mut engine, owner, admin) = engine();
    let carol = Address::from_label("carol");
    let alice = Address::from_label("alice");

    engine.set_admin(owner, carol).unwrap();

    assert!(matches!(
        engine.admin_transfer(admin, owner, alice, 100),
        Err(EngineError::Ledger(LedgerError::Unauthorized))
    ));
    engine.admin_transfer(carol, owner, alice, 100).unwrap();
    assert_eq!(engine.balance_of(alice), 100);
}

// ============================================================================
// CONFIGURATION GUARDS
// ============================================================================

#[test]
fn test_engine_rejects_zero_owner() {
    let config = EngineConfig::new(
        Address::zero(),
        Address::from_label("admin"),
        Address::from_label("fund"),
    );

    assert!(matches!(
        SaleEngine::new(config),
        Err(EngineError::InvalidConfig(_))
    ));
}

#[test]
fn test_engine_rejects_coinciding_identities() {
    let owner = Address::from_label("owner");
    let config = EngineConfig::new(owner, Address::from_label("admin"), owner);

    assert!(matches!(
        SaleEngine::new(config),
        Err(EngineError::InvalidConfig(_))
    ));
}

#[test]
fn test_engine_rejects_escrow_colliding_with_fund() {
    let fund = Address::from_label("fund");
    let config = EngineConfig::new(
        Address::from_label("owner"),
        Address::from_label("admin"),
        fund,
    )
    .with_sale_escrow(fund);

    assert!(matches!(
        SaleEngine::new(config),
        Err(EngineError::InvalidConfig(_))
    ));
}

// ============================================================================
// FUND-SALE GUARDS
// ============================================================================

#[test]
fn test_fund_sale_is_one_shot() {
    let (mut engine, owner, _) = engine();

    engine.fund_sale(owner, 0).unwrap();
    assert!(engine.sale_funded());
    assert_eq!(engine.sale_balance(), 400_000);

    let result = engine.fund_sale(owner, 100);
    assert!(matches!(result, Err(EngineError::SaleAlreadyFunded)));
    assert_eq!(engine.sale_balance(), 400_000);
}

#[test]
fn test_fund_sale_zero_selects_default_allocation() {
    let (mut engine, owner, _) = engine();

    engine.fund_sale(owner, 0).unwrap();

    assert_eq!(engine.sale_balance(), 400_000);
    assert_eq!(engine.balance_of(owner), 600_000);
}

#[test]
fn test_fund_sale_explicit_amount() {
    let (mut engine, owner, _) = engine();

    engine.fund_sale(owner, 123_456).unwrap();

    assert_eq!(engine.sale_balance(), 123_456);
    assert_eq!(engine.balance_of(owner), 876_544);
}

#[test]
fn test_fund_sale_cannot_exceed_owner_balance() {
    let (mut engine, owner, _) = engine();

    let result = engine.fund_sale(owner, 2_000_000);

    assert!(matches!(
        result,
        Err(EngineError::Ledger(LedgerError::InsufficientBalance { .. }))
    ));
    assert!(!engine.sale_funded());
    assert_eq!(engine.balance_of(owner), 1_000_000);
}
