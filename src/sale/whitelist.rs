// Whitelist - Owner-gated admission set for purchases

use crate::identity::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhitelistError {
    #[error("Caller is not authorized for this operation")]
    Unauthorized,
}

/// Addresses admitted to purchase. Membership changes only through
/// owner-issued calls and never expires on its own.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Whitelist {
    owner: Address,
    members: HashSet<Address>,
}

impl Whitelist {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            members: HashSet::new(),
        }
    }

    fn require_owner(&self, caller: Address) -> Result<(), WhitelistError> {
        if caller != self.owner {
            return Err(WhitelistError::Unauthorized);
        }
        Ok(())
    }

    /// Admit an address (owner only). Adding a member twice is a no-op.
    pub fn add(&mut self, caller: Address, address: Address) -> Result<(), WhitelistError> {
        self.require_owner(caller)?;
        self.members.insert(address);
        Ok(())
    }

    /// Admit a batch of addresses (owner only)
    pub fn add_many(&mut self, caller: Address, addresses: &[Address]) -> Result<(), WhitelistError> {
        self.require_owner(caller)?;
        for address in addresses {
            self.members.insert(*address);
        }
        Ok(())
    }

    /// Revoke an address (owner only). Removing a non-member is a no-op.
    pub fn remove(&mut self, caller: Address, address: Address) -> Result<(), WhitelistError> {
        self.require_owner(caller)?;
        self.members.remove(&address);
        Ok(())
    }

    /// Revoke a batch of addresses (owner only)
    pub fn remove_many(
        &mut self,
        caller: Address,
        addresses: &[Address],
    ) -> Result<(), WhitelistError> {
        self.require_owner(caller)?;
        for address in addresses {
            self.members.remove(address);
        }
        Ok(())
    }

    pub fn is_member(&self, address: Address) -> bool {
        self.members.contains(&address)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sorted snapshot of the current membership
    pub fn members(&self) -> Vec<Address> {
        let mut members: Vec<Address> = self.members.iter().copied().collect();
        members.sort();
        members
    }
}
