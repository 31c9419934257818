// Funds log - Forwarding record for the fund address

use crate::identity::Address;
use crate::sale::Round;
use serde::{Deserialize, Serialize};

/// Record of one successful purchase
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    seq: u64,
    buyer: Address,
    round: Round,
    contribution: u64,
    token_amount: u64,
}

impl PurchaseReceipt {
    /// Position in the purchase history, starting at 1
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn buyer(&self) -> Address {
        self.buyer
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn contribution(&self) -> u64 {
        self.contribution
    }

    pub fn token_amount(&self) -> u64 {
        self.token_amount
    }
}

/// Ordered record of every contribution forwarded to the fund address
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FundsLog {
    fund_address: Address,
    total_forwarded: u64,
    receipts: Vec<PurchaseReceipt>,
}

impl FundsLog {
    pub fn new(fund_address: Address) -> Self {
        Self {
            fund_address,
            total_forwarded: 0,
            receipts: Vec::new(),
        }
    }

    /// Append a purchase and forward its contribution. Returns `None` when
    /// the forwarded total would overflow.
    pub(crate) fn record(
        &mut self,
        buyer: Address,
        round: Round,
        contribution: u64,
        token_amount: u64,
    ) -> Option<PurchaseReceipt> {
        let total = self.total_forwarded.checked_add(contribution)?;

        let receipt = PurchaseReceipt {
            seq: self.receipts.len() as u64 + 1,
            buyer,
            round,
            contribution,
            token_amount,
        };

        self.total_forwarded = total;
        self.receipts.push(receipt.clone());
        Some(receipt)
    }

    pub fn fund_address(&self) -> Address {
        self.fund_address
    }

    /// Sum of all forwarded contributions across every round
    pub fn total_forwarded(&self) -> u64 {
        self.total_forwarded
    }

    pub fn receipts(&self) -> &[PurchaseReceipt] {
        &self.receipts
    }

    pub fn receipt_count(&self) -> usize {
        self.receipts.len()
    }
}
