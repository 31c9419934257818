// Engine configuration

use super::engine::EngineError;
use crate::identity::Address;

/// Default total supply credited to the owner at creation
pub const DEFAULT_TOTAL_SUPPLY: u64 = 1_000_000_000;

/// Default escrow funding selected by a zero-amount fund call
pub const DEFAULT_SALE_ALLOCATION: u64 = 500_000_000;

/// Configuration for the sale engine
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Ledger owner; receives the full supply and runs the sale
    pub owner: Address,
    /// Privileged transfer identity
    pub admin: Address,
    /// Destination for forwarded contributions
    pub fund_address: Address,
    /// Holding account for the undistributed sale allocation.
    /// Derived from the owner when not set explicitly.
    pub sale_escrow: Option<Address>,
    /// Total token supply
    pub total_supply: u64,
    /// Amount moved into escrow by a zero-amount fund call
    pub sale_allocation: u64,
}

impl EngineConfig {
    /// Create a config with the three required identities
    pub fn new(owner: Address, admin: Address, fund_address: Address) -> Self {
        Self {
            owner,
            admin,
            fund_address,
            sale_escrow: None,
            total_supply: DEFAULT_TOTAL_SUPPLY,
            sale_allocation: DEFAULT_SALE_ALLOCATION,
        }
    }

    /// Set an explicit sale escrow account
    pub fn with_sale_escrow(mut self, escrow: Address) -> Self {
        self.sale_escrow = Some(escrow);
        self
    }

    /// Set the total supply
    pub fn with_total_supply(mut self, supply: u64) -> Self {
        self.total_supply = supply;
        self
    }

    /// Set the default sale allocation
    pub fn with_sale_allocation(mut self, allocation: u64) -> Self {
        self.sale_allocation = allocation;
        self
    }

    /// The escrow account purchases and allocations draw from
    pub fn escrow_address(&self) -> Address {
        self.sale_escrow
            .unwrap_or_else(|| Address::from_label(&format!("sale-escrow:{}", self.owner)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.owner.is_zero() {
            return Err(EngineError::InvalidConfig(
                "owner must not be the zero address".to_string(),
            ));
        }
        if self.admin.is_zero() {
            return Err(EngineError::InvalidConfig(
                "admin must not be the zero address".to_string(),
            ));
        }
        if self.fund_address.is_zero() {
            return Err(EngineError::InvalidConfig(
                "fund_address must not be the zero address".to_string(),
            ));
        }

        let escrow = self.escrow_address();
        if escrow.is_zero() {
            return Err(EngineError::InvalidConfig(
                "sale_escrow must not be the zero address".to_string(),
            ));
        }

        // The special accounts play different roles in every flow; letting
        // two of them coincide makes balances ambiguous.
        let special = [self.owner, self.admin, self.fund_address, escrow];
        for i in 0..special.len() {
            for j in (i + 1)..special.len() {
                if special[i] == special[j] {
                    return Err(EngineError::InvalidConfig(
                        "owner, admin, fund_address, and sale_escrow must be distinct".to_string(),
                    ));
                }
            }
        }

        if self.total_supply == 0 {
            return Err(EngineError::InvalidConfig(
                "total_supply must be > 0".to_string(),
            ));
        }
        if self.sale_allocation > self.total_supply {
            return Err(EngineError::InvalidConfig(
                "sale_allocation must not exceed total_supply".to_string(),
            ));
        }

        Ok(())
    }
}
