// Ledger module - BALANCES AND TRANSFER POLICY
// Handles accounts, lock floors, and the owner/admin authority over them

mod account;
mod token;

pub use account::{Account, AccountBook};
pub use token::{LedgerError, TokenLedger};
