// Engine events - Observable record of successful mutations

use crate::identity::Address;
use crate::sale::Round;
use serde::{Deserialize, Serialize};

/// Events emitted by the engine. Queued on success, drained with
/// `poll_events`; events from a failed operation are discarded with the
/// rest of the rolled-back draft.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EngineEvent {
    /// The global transfer switch changed
    TransferEnabledSet { enabled: bool },
    /// Tokens moved between accounts
    Transferred {
        from: Address,
        to: Address,
        amount: u64,
    },
    /// The admin identity was reassigned
    AdminChanged {
        previous: Address,
        new_admin: Address,
    },
    /// An account's lock floor was set
    AccountLocked { target: Address, amount: u64 },
    /// An account's lock floor was cleared
    AccountUnlocked { target: Address },
    /// The sale escrow received its allocation
    SaleFunded { amount: u64 },
    /// A round was configured and entered set-up
    SaleConfigured { round: Round, rate: u64 },
    /// The configured round opened for contributions
    SaleStarted { round: Round, cap: u64 },
    /// The running round closed
    SaleEnded { round: Round, raised: u64 },
    /// An address was admitted to the whitelist
    WhitelistAdded { address: Address },
    /// An address was removed from the whitelist
    WhitelistRemoved { address: Address },
    /// An address's allocation cap was set
    AllocationCapSet { address: Address, cap: u64 },
    /// An address's allocation cap was removed
    AllocationCapRemoved { address: Address },
    /// Tokens were granted against an allocation cap
    TokensAllocated { address: Address, amount: u64 },
    /// A purchase credited tokens to a buyer
    TokensPurchased {
        buyer: Address,
        contribution: u64,
        token_amount: u64,
    },
    /// A contribution was forwarded to the fund address
    FundsForwarded { to: Address, amount: u64 },
}
