// Sale engine - The public operation surface
// Owns every component and wraps each mutation in a commit-or-discard boundary

use super::config::EngineConfig;
use super::events::EngineEvent;
use super::funds::{FundsLog, PurchaseReceipt};
use crate::identity::Address;
use crate::ledger::{LedgerError, TokenLedger};
use crate::sale::{
    AllocationError, AllocationRegistry, Round, SaleController, SaleError, Stage, Whitelist,
    WhitelistError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ENGINE ERROR
// ============================================================================

/// Errors surfaced by engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Sale escrow is already funded")]
    SaleAlreadyFunded,

    #[error("Address is not whitelisted: {0}")]
    NotWhitelisted(Address),

    #[error("Deserialization failed")]
    DeserializationFailed,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Sale error: {0}")]
    Sale(#[from] SaleError),

    #[error("Whitelist error: {0}")]
    Whitelist(#[from] WhitelistError),

    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),
}

// ============================================================================
// ENGINE STATS
// ============================================================================

/// Snapshot of the engine's headline numbers
#[derive(Clone, Debug)]
pub struct EngineStats {
    pub total_supply: u64,
    pub circulating_supply: u64,
    pub account_count: usize,
    pub round: Round,
    pub stage: Stage,
    pub raised: u64,
    pub sale_balance: u64,
    pub forwarded_total: u64,
    pub purchase_count: usize,
    pub whitelist_size: usize,
    pub allocation_entries: usize,
    pub allocation_remaining: u64,
}

// ============================================================================
// ENGINE STATE
// ============================================================================

/// Complete engine state. Cloned wholesale for the transaction boundary
/// and serialized wholesale for snapshots.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct EngineState {
    ledger: TokenLedger,
    sale: SaleController,
    whitelist: Whitelist,
    allocations: AllocationRegistry,
    funds: FundsLog,
    /// Holding account for the undistributed sale allocation
    sale_escrow: Address,
    /// Set once by the first fund call
    sale_funded: bool,
    /// Escrow funding selected by a zero-amount fund call
    default_sale_allocation: u64,
    /// Pending events, drained by `poll_events`
    events: Vec<EngineEvent>,
}

impl EngineState {
    /// One allocation grant: draw down the cap, then deliver from escrow.
    /// Shared by the single and batch entry points.
    fn allocate_tokens(
        &mut self,
        caller: Address,
        address: Address,
        amount: u64,
    ) -> Result<(), EngineError> {
        self.allocations.consume(caller, address, amount)?;
        self.ledger
            .privileged_transfer(self.sale_escrow, address, amount)?;
        self.events
            .push(EngineEvent::TokensAllocated { address, amount });
        Ok(())
    }
}

// ============================================================================
// SALE ENGINE
// ============================================================================

/// The sale engine - the only mutating surface over the ledger, the sale
/// controller, the whitelist, and the allocation registry.
///
/// Every mutating operation runs against a draft clone of the state and
/// commits only on success, so the first violated precondition aborts the
/// whole call with zero observable change - including part-way through a
/// batch.
#[derive(Clone, Debug)]
pub struct SaleEngine {
    state: EngineState,
}

impl SaleEngine {
    /// Create an engine from a validated configuration. The full supply
    /// starts with the owner; the sale opens ended, before any set-up.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let state = EngineState {
            ledger: TokenLedger::new(config.owner, config.admin, config.total_supply),
            sale: SaleController::new(config.owner),
            whitelist: Whitelist::new(config.owner),
            allocations: AllocationRegistry::new(config.owner),
            funds: FundsLog::new(config.fund_address),
            sale_escrow: config.escrow_address(),
            sale_funded: false,
            default_sale_allocation: config.sale_allocation,
            events: Vec::new(),
        };

        Ok(Self { state })
    }

    /// Run one operation against a draft of the state, committing the draft
    /// only when it succeeds
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut EngineState) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut draft = self.state.clone();
        let value = op(&mut draft)?;
        self.state = draft;
        Ok(value)
    }

    // ========================================================================
    // LEDGER OPERATIONS
    // ========================================================================

    /// Switch unprivileged transfers on or off (owner only)
    pub fn set_transfer_enabled(
        &mut self,
        caller: Address,
        enabled: bool,
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.ledger.set_transfer_enabled(caller, enabled)?;
            state.events.push(EngineEvent::TransferEnabledSet { enabled });
            Ok(())
        })
    }

    /// Transfer from the caller's own account
    pub fn transfer(&mut self, caller: Address, to: Address, amount: u64) -> Result<(), EngineError> {
        self.commit(|state| {
            state.ledger.transfer(caller, to, amount)?;
            state.events.push(EngineEvent::Transferred {
                from: caller,
                to,
                amount,
            });
            Ok(())
        })
    }

    /// Move tokens between arbitrary accounts (admin only)
    pub fn admin_transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.ledger.admin_transfer(caller, from, to, amount)?;
            state.events.push(EngineEvent::Transferred { from, to, amount });
            Ok(())
        })
    }

    /// Set an account's lock floor (owner only)
    pub fn lock_account(
        &mut self,
        caller: Address,
        target: Address,
        amount: u64,
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.ledger.lock_account(caller, target, amount)?;
            state.events.push(EngineEvent::AccountLocked { target, amount });
            Ok(())
        })
    }

    /// Clear an account's lock floor (owner only)
    pub fn unlock_account(&mut self, caller: Address, target: Address) -> Result<(), EngineError> {
        self.commit(|state| {
            state.ledger.unlock_account(caller, target)?;
            state.events.push(EngineEvent::AccountUnlocked { target });
            Ok(())
        })
    }

    /// Reassign the admin identity (owner only)
    pub fn set_admin(&mut self, caller: Address, new_admin: Address) -> Result<(), EngineError> {
        self.commit(|state| {
            let previous = state.ledger.admin();
            state.ledger.set_admin(caller, new_admin)?;
            state.events.push(EngineEvent::AdminChanged {
                previous,
                new_admin,
            });
            Ok(())
        })
    }

    // ========================================================================
    // SALE LIFECYCLE
    // ========================================================================

    /// Move the sale allocation from the owner into escrow (owner only,
    /// once). A zero amount selects the configured default allocation.
    pub fn fund_sale(&mut self, caller: Address, amount: u64) -> Result<(), EngineError> {
        self.commit(|state| {
            let owner = state.ledger.owner();
            if caller != owner {
                return Err(LedgerError::Unauthorized.into());
            }
            if state.sale_funded {
                return Err(EngineError::SaleAlreadyFunded);
            }

            let amount = if amount == 0 {
                state.default_sale_allocation
            } else {
                amount
            };

            let escrow = state.sale_escrow;
            state.ledger.privileged_transfer(owner, escrow, amount)?;
            state.sale_funded = true;
            state.events.push(EngineEvent::SaleFunded { amount });
            Ok(())
        })
    }

    /// Configure a round and enter set-up (owner only)
    pub fn set_up_sale(
        &mut self,
        caller: Address,
        round: Round,
        reserved: [u64; 3],
        rate: u64,
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.sale.set_up_sale(caller, round, reserved, rate)?;
            state.events.push(EngineEvent::SaleConfigured { round, rate });
            Ok(())
        })
    }

    /// Open the configured round for contributions (owner only)
    pub fn start_sale(&mut self, caller: Address, cap: u64) -> Result<(), EngineError> {
        self.commit(|state| {
            state.sale.start_sale(caller, cap)?;
            state.events.push(EngineEvent::SaleStarted {
                round: state.sale.round(),
                cap,
            });
            Ok(())
        })
    }

    /// Close the running round (owner only)
    pub fn end_sale(&mut self, caller: Address) -> Result<(), EngineError> {
        self.commit(|state| {
            state.sale.end_sale(caller)?;
            state.events.push(EngineEvent::SaleEnded {
                round: state.sale.round(),
                raised: state.sale.raised(),
            });
            Ok(())
        })
    }

    // ========================================================================
    // WHITELIST
    // ========================================================================

    /// Admit an address to purchase (owner only)
    pub fn add_to_whitelist(&mut self, caller: Address, address: Address) -> Result<(), EngineError> {
        self.commit(|state| {
            state.whitelist.add(caller, address)?;
            state.events.push(EngineEvent::WhitelistAdded { address });
            Ok(())
        })
    }

    /// Admit a batch of addresses (owner only)
    pub fn add_many_to_whitelist(
        &mut self,
        caller: Address,
        addresses: &[Address],
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.whitelist.add_many(caller, addresses)?;
            for address in addresses {
                state.events.push(EngineEvent::WhitelistAdded { address: *address });
            }
            Ok(())
        })
    }

    /// Revoke an address (owner only)
    pub fn remove_from_whitelist(
        &mut self,
        caller: Address,
        address: Address,
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.whitelist.remove(caller, address)?;
            state.events.push(EngineEvent::WhitelistRemoved { address });
            Ok(())
        })
    }

    /// Revoke a batch of addresses (owner only)
    pub fn remove_many_from_whitelist(
        &mut self,
        caller: Address,
        addresses: &[Address],
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.whitelist.remove_many(caller, addresses)?;
            for address in addresses {
                state.events.push(EngineEvent::WhitelistRemoved { address: *address });
            }
            Ok(())
        })
    }

    // ========================================================================
    // ALLOCATIONS
    // ========================================================================

    /// Set an address's allocation cap (owner only)
    pub fn add_allocation(
        &mut self,
        caller: Address,
        address: Address,
        cap: u64,
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.allocations.add(caller, address, cap)?;
            state.events.push(EngineEvent::AllocationCapSet { address, cap });
            Ok(())
        })
    }

    /// Set caps for a batch of addresses (owner only)
    pub fn add_many_allocations(
        &mut self,
        caller: Address,
        entries: &[(Address, u64)],
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.allocations.add_many(caller, entries)?;
            for (address, cap) in entries {
                state.events.push(EngineEvent::AllocationCapSet {
                    address: *address,
                    cap: *cap,
                });
            }
            Ok(())
        })
    }

    /// Remove an address's allocation cap (owner only)
    pub fn remove_allocation(
        &mut self,
        caller: Address,
        address: Address,
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.allocations.remove(caller, address)?;
            state.events.push(EngineEvent::AllocationCapRemoved { address });
            Ok(())
        })
    }

    /// Remove caps for a batch of addresses (owner only)
    pub fn remove_many_allocations(
        &mut self,
        caller: Address,
        addresses: &[Address],
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            state.allocations.remove_many(caller, addresses)?;
            for address in addresses {
                state.events.push(EngineEvent::AllocationCapRemoved { address: *address });
            }
            Ok(())
        })
    }

    /// Grant tokens from escrow against an address's allocation cap
    /// (owner only)
    pub fn allocate_tokens(
        &mut self,
        caller: Address,
        address: Address,
        amount: u64,
    ) -> Result<(), EngineError> {
        self.commit(|state| state.allocate_tokens(caller, address, amount))
    }

    /// Grant tokens to a batch of addresses (owner only). The batch is
    /// atomic as a whole: one failing grant discards every grant.
    pub fn allocate_tokens_to_many(
        &mut self,
        caller: Address,
        grants: &[(Address, u64)],
    ) -> Result<(), EngineError> {
        self.commit(|state| {
            for (address, amount) in grants {
                state.allocate_tokens(caller, *address, *amount)?;
            }
            Ok(())
        })
    }

    // ========================================================================
    // PURCHASE
    // ========================================================================

    /// Convert a contribution into tokens for a whitelisted buyer.
    ///
    /// Checks run in admission order: the round must be started, the buyer
    /// whitelisted, the token amount representable, the escrow funded for
    /// it, and the cap respected. On success the tokens leave escrow, the
    /// raised total grows, and the contribution is forwarded to the fund
    /// address.
    pub fn purchase(
        &mut self,
        caller: Address,
        contribution: u64,
    ) -> Result<PurchaseReceipt, EngineError> {
        self.commit(|state| {
            state.sale.ensure_started()?;

            if !state.whitelist.is_member(caller) {
                return Err(EngineError::NotWhitelisted(caller));
            }

            let token_amount = contribution
                .checked_mul(state.sale.rate())
                .ok_or(LedgerError::BalanceOverflow)?;

            let escrow = state.sale_escrow;
            state.ledger.privileged_transfer(escrow, caller, token_amount)?;
            state.sale.accept_contribution(contribution)?;

            let receipt = state
                .funds
                .record(caller, state.sale.round(), contribution, token_amount)
                .ok_or(LedgerError::BalanceOverflow)?;

            state.events.push(EngineEvent::TokensPurchased {
                buyer: caller,
                contribution,
                token_amount,
            });
            state.events.push(EngineEvent::FundsForwarded {
                to: state.funds.fund_address(),
                amount: contribution,
            });

            Ok(receipt)
        })
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn owner(&self) -> Address {
        self.state.ledger.owner()
    }

    pub fn admin(&self) -> Address {
        self.state.ledger.admin()
    }

    pub fn transfer_enabled(&self) -> bool {
        self.state.ledger.transfer_enabled()
    }

    pub fn total_supply(&self) -> u64 {
        self.state.ledger.total_supply()
    }

    pub fn balance_of(&self, address: Address) -> u64 {
        self.state.ledger.balance_of(address)
    }

    pub fn locked_amount_of(&self, address: Address) -> u64 {
        self.state.ledger.locked_amount_of(address)
    }

    /// Sum of all balances; stays equal to `total_supply`
    pub fn total_balance(&self) -> u64 {
        self.state.ledger.total_balance()
    }

    /// Supply held outside the owner and the escrow
    pub fn circulating_supply(&self) -> u64 {
        self.state
            .ledger
            .total_supply()
            .saturating_sub(self.state.ledger.balance_of(self.owner()))
            .saturating_sub(self.sale_balance())
    }

    pub fn round(&self) -> Round {
        self.state.sale.round()
    }

    pub fn stage(&self) -> Stage {
        self.state.sale.stage()
    }

    pub fn rate(&self) -> u64 {
        self.state.sale.rate()
    }

    pub fn cap(&self) -> u64 {
        self.state.sale.cap()
    }

    pub fn raised(&self) -> u64 {
        self.state.sale.raised()
    }

    pub fn reserved(&self) -> [u64; 3] {
        self.state.sale.reserved()
    }

    pub fn is_whitelisted(&self, address: Address) -> bool {
        self.state.whitelist.is_member(address)
    }

    pub fn whitelist_size(&self) -> usize {
        self.state.whitelist.len()
    }

    pub fn whitelist_members(&self) -> Vec<Address> {
        self.state.whitelist.members()
    }

    pub fn remaining_allocation(&self, address: Address) -> u64 {
        self.state.allocations.remaining(address)
    }

    pub fn sale_escrow(&self) -> Address {
        self.state.sale_escrow
    }

    pub fn sale_funded(&self) -> bool {
        self.state.sale_funded
    }

    /// Undistributed tokens still held in escrow
    pub fn sale_balance(&self) -> u64 {
        self.state.ledger.balance_of(self.state.sale_escrow)
    }

    pub fn fund_address(&self) -> Address {
        self.state.funds.fund_address()
    }

    pub fn forwarded_total(&self) -> u64 {
        self.state.funds.total_forwarded()
    }

    pub fn receipts(&self) -> &[PurchaseReceipt] {
        self.state.funds.receipts()
    }

    /// Poll for events (clears the event queue)
    pub fn poll_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Number of events waiting to be drained
    pub fn pending_events(&self) -> usize {
        self.state.events.len()
    }

    /// Get statistics
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            total_supply: self.total_supply(),
            circulating_supply: self.circulating_supply(),
            account_count: self.state.ledger.account_count(),
            round: self.round(),
            stage: self.stage(),
            raised: self.raised(),
            sale_balance: self.sale_balance(),
            forwarded_total: self.forwarded_total(),
            purchase_count: self.state.funds.receipt_count(),
            whitelist_size: self.whitelist_size(),
            allocation_entries: self.state.allocations.entry_count(),
            allocation_remaining: self.state.allocations.total_remaining(),
        }
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    /// Serialize the complete engine state to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        postcard::to_allocvec(&self.state).unwrap_or_default()
    }

    /// Restore an engine from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        let state = postcard::from_bytes(bytes).map_err(|_| EngineError::DeserializationFailed)?;
        Ok(Self { state })
    }
}
