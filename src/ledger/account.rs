// Account book - Per-address balances and lock floors

use crate::identity::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single ledger account. Accounts are created on first touch and never
/// removed, only zeroed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    balance: u64,
    locked_amount: u64,
}

impl Account {
    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn locked_amount(&self) -> u64 {
        self.locked_amount
    }

    /// Balance above the lock floor
    pub fn spendable(&self) -> u64 {
        self.balance.saturating_sub(self.locked_amount)
    }

    pub(crate) fn set_balance(&mut self, balance: u64) {
        self.balance = balance;
    }

    pub(crate) fn set_locked(&mut self, locked_amount: u64) {
        self.locked_amount = locked_amount;
    }
}

/// The set of all accounts. Mutation goes through the ledger's policy
/// checks; this type only stores.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountBook {
    accounts: HashMap<Address, Account>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Get an account, if it has ever been touched
    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Get or create the account for an address
    pub(crate) fn ensure(&mut self, address: Address) -> &mut Account {
        self.accounts.entry(address).or_default()
    }

    /// Balance of an address (zero if never touched)
    pub fn balance_of(&self, address: &Address) -> u64 {
        self.accounts.get(address).map(|a| a.balance).unwrap_or(0)
    }

    /// Lock floor of an address (zero if never touched)
    pub fn locked_amount_of(&self, address: &Address) -> u64 {
        self.accounts
            .get(address)
            .map(|a| a.locked_amount)
            .unwrap_or(0)
    }

    /// Sum of all balances
    pub fn total_balance(&self) -> u64 {
        self.accounts.values().map(|a| a.balance).sum()
    }

    /// Number of accounts ever touched
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
