// Allocation registry - Pre-sale grant caps per address

use crate::identity::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("Insufficient allocation: remaining {remaining}, requested {requested}")]
    InsufficientAllocation { remaining: u64, requested: u64 },
}

/// Remaining grant cap per address. Caps are set by the owner and drawn
/// down by allocation issuance; issuing past the cap is refused.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AllocationRegistry {
    owner: Address,
    remaining: HashMap<Address, u64>,
}

impl AllocationRegistry {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            remaining: HashMap::new(),
        }
    }

    fn require_owner(&self, caller: Address) -> Result<(), AllocationError> {
        if caller != self.owner {
            return Err(AllocationError::Unauthorized);
        }
        Ok(())
    }

    /// Set an address's remaining cap (owner only). Overwrites any previous
    /// cap rather than adding to it.
    pub fn add(&mut self, caller: Address, address: Address, cap: u64) -> Result<(), AllocationError> {
        self.require_owner(caller)?;
        self.remaining.insert(address, cap);
        Ok(())
    }

    /// Set caps for a batch of addresses (owner only)
    pub fn add_many(
        &mut self,
        caller: Address,
        entries: &[(Address, u64)],
    ) -> Result<(), AllocationError> {
        self.require_owner(caller)?;
        for (address, cap) in entries {
            self.remaining.insert(*address, *cap);
        }
        Ok(())
    }

    /// Zero an address's remaining cap (owner only)
    pub fn remove(&mut self, caller: Address, address: Address) -> Result<(), AllocationError> {
        self.require_owner(caller)?;
        self.remaining.remove(&address);
        Ok(())
    }

    /// Zero caps for a batch of addresses (owner only)
    pub fn remove_many(
        &mut self,
        caller: Address,
        addresses: &[Address],
    ) -> Result<(), AllocationError> {
        self.require_owner(caller)?;
        for address in addresses {
            self.remaining.remove(address);
        }
        Ok(())
    }

    /// Draw down an address's remaining cap (owner only)
    pub fn consume(
        &mut self,
        caller: Address,
        address: Address,
        amount: u64,
    ) -> Result<(), AllocationError> {
        self.require_owner(caller)?;

        let remaining = self.remaining(address);
        if amount > remaining {
            return Err(AllocationError::InsufficientAllocation {
                remaining,
                requested: amount,
            });
        }

        self.remaining.insert(address, remaining - amount);
        Ok(())
    }

    /// Remaining cap of an address (zero if absent)
    pub fn remaining(&self, address: Address) -> u64 {
        self.remaining.get(&address).copied().unwrap_or(0)
    }

    pub fn entry_count(&self) -> usize {
        self.remaining.len()
    }

    /// Sum of all remaining caps
    pub fn total_remaining(&self) -> u64 {
        self.remaining.values().sum()
    }
}
