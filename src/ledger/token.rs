// Token ledger - Transfer policy over the account book

use crate::identity::Address;
use crate::ledger::account::{Account, AccountBook};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("The zero address is not a valid destination")]
    InvalidDestination,

    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: u64, required: u64 },

    #[error("Transfer breaches the lock floor: balance {balance}, locked {locked}, requested {requested}")]
    LockedFunds {
        balance: u64,
        locked: u64,
        requested: u64,
    },

    #[error("Balance would overflow")]
    BalanceOverflow,
}

/// The token ledger - balances, lock floors, and the transfer policy
/// guarding them.
///
/// The full supply is credited to the owner at creation; no operation mints
/// or burns afterwards, so the sum of all balances stays equal to
/// `total_supply`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenLedger {
    /// Set at creation, immutable
    owner: Address,
    /// Privileged transfer identity, reassignable by the owner
    admin: Address,
    /// Global switch for unprivileged transfers (off at creation)
    transfer_enabled: bool,
    /// Fixed at creation
    total_supply: u64,
    accounts: AccountBook,
}

impl TokenLedger {
    /// Create a ledger with the full supply credited to the owner
    pub fn new(owner: Address, admin: Address, total_supply: u64) -> Self {
        let mut accounts = AccountBook::new();
        accounts.ensure(owner).set_balance(total_supply);
        Self {
            owner,
            admin,
            transfer_enabled: false,
            total_supply,
            accounts,
        }
    }

    // ========================================================================
    // AUTHORITY
    // ========================================================================

    fn require_owner(&self, caller: Address) -> Result<(), LedgerError> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    /// Switch unprivileged transfers on or off (owner only)
    pub fn set_transfer_enabled(
        &mut self,
        caller: Address,
        enabled: bool,
    ) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        self.transfer_enabled = enabled;
        Ok(())
    }

    /// Reassign the admin identity (owner only)
    pub fn set_admin(&mut self, caller: Address, new_admin: Address) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        if new_admin.is_zero() {
            return Err(LedgerError::InvalidDestination);
        }
        self.admin = new_admin;
        Ok(())
    }

    // ========================================================================
    // TRANSFERS
    // ========================================================================

    /// Transfer from the caller's own account.
    ///
    /// Admitted only while transfers are enabled, except for the admin, who
    /// may always send. The caller's lock floor binds either way: the
    /// post-transfer balance must not drop below it.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: u64) -> Result<(), LedgerError> {
        if !self.transfer_enabled && caller != self.admin {
            return Err(LedgerError::Unauthorized);
        }
        if to.is_zero() {
            return Err(LedgerError::InvalidDestination);
        }

        let balance = self.accounts.balance_of(&caller);
        if amount > balance {
            return Err(LedgerError::InsufficientBalance {
                available: balance,
                required: amount,
            });
        }

        let locked = self.accounts.locked_amount_of(&caller);
        if balance - amount < locked {
            return Err(LedgerError::LockedFunds {
                balance,
                locked,
                requested: amount,
            });
        }

        self.privileged_transfer(caller, to, amount)
    }

    /// Move tokens between arbitrary accounts (admin only). Bypasses the
    /// transfer-enabled flag and the source's lock floor.
    pub fn admin_transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if caller != self.admin {
            return Err(LedgerError::Unauthorized);
        }
        self.privileged_transfer(from, to, amount)
    }

    /// Unchecked-policy transfer used inside the crate for sale funding,
    /// allocation grants, and purchase delivery. Destination and balance
    /// checks only.
    pub(crate) fn privileged_transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::InvalidDestination);
        }

        let available = self.accounts.balance_of(&from);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                available,
                required: amount,
            });
        }

        // Self-transfers change nothing; applying them naively would
        // double-count the shared account.
        if from != to {
            let new_to = self
                .accounts
                .balance_of(&to)
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow)?;
            self.accounts.ensure(from).set_balance(available - amount);
            self.accounts.ensure(to).set_balance(new_to);
        }

        Ok(())
    }

    // ========================================================================
    // LOCKS
    // ========================================================================

    /// Set an account's lock floor (owner only). Overwrites any previous
    /// lock rather than adding to it.
    pub fn lock_account(
        &mut self,
        caller: Address,
        target: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        self.accounts.ensure(target).set_locked(amount);
        Ok(())
    }

    /// Clear an account's lock floor (owner only)
    pub fn unlock_account(&mut self, caller: Address, target: Address) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        self.accounts.ensure(target).set_locked(0);
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn transfer_enabled(&self) -> bool {
        self.transfer_enabled
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn balance_of(&self, address: Address) -> u64 {
        self.accounts.balance_of(&address)
    }

    pub fn locked_amount_of(&self, address: Address) -> u64 {
        self.accounts.locked_amount_of(&address)
    }

    pub fn account(&self, address: Address) -> Option<&Account> {
        self.accounts.get(&address)
    }

    /// Sum of all balances; equals `total_supply` unless the ledger has
    /// been corrupted.
    pub fn total_balance(&self) -> u64 {
        self.accounts.total_balance()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.account_count()
    }
}
