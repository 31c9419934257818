// Sale controller - Round and stage state machine

use crate::identity::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during sale lifecycle operations
#[derive(Error, Debug)]
pub enum SaleError {
    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("Invalid sale stage: expected {expected}, found {actual}")]
    InvalidState { expected: Stage, actual: Stage },

    #[error("Contribution cap exceeded: cap {cap}, raised {raised}, attempted {attempted}")]
    CapExceeded {
        cap: u64,
        raised: u64,
        attempted: u64,
    },

    #[error("Raised total would overflow")]
    RaisedOverflow,

    #[error("Unknown round: {0}")]
    UnknownRound(String),
}

/// Fundraising round. Rounds do not advance on their own; each one is
/// entered by a fresh set-up call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    EarlyInvestment,
    PreSale,
    CrowdSale,
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Round::EarlyInvestment => "early-investment",
            Round::PreSale => "pre-sale",
            Round::CrowdSale => "crowd-sale",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Round {
    type Err = SaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "early-investment" | "early" => Ok(Round::EarlyInvestment),
            "pre-sale" | "pre" => Ok(Round::PreSale),
            "crowd-sale" | "crowd" => Ok(Round::CrowdSale),
            other => Err(SaleError::UnknownRound(other.to_string())),
        }
    }
}

/// Lifecycle stage of the current round. Only SetUp -> Started -> Ended
/// transitions are reachable inside one set-up cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    SetUp,
    Started,
    Ended,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SetUp => "set-up",
            Stage::Started => "started",
            Stage::Ended => "ended",
        };
        write!(f, "{}", name)
    }
}

/// The sale controller - owns the round/stage machine, the conversion
/// rate, and the running contribution totals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaleController {
    owner: Address,
    round: Round,
    stage: Stage,
    /// Tokens credited per contribution unit
    rate: u64,
    /// Maximum contribution units accepted while started; zero is uncapped
    cap: u64,
    /// Contribution units accepted since the last set-up
    raised: u64,
    /// Extension parameters carried through set-up, not interpreted
    reserved: [u64; 3],
}

impl SaleController {
    /// A fresh controller starts ended, before any round was set up
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            round: Round::EarlyInvestment,
            stage: Stage::Ended,
            rate: 0,
            cap: 0,
            raised: 0,
            reserved: [0; 3],
        }
    }

    fn require_owner(&self, caller: Address) -> Result<(), SaleError> {
        if caller != self.owner {
            return Err(SaleError::Unauthorized);
        }
        Ok(())
    }

    /// Configure a round (owner only). Valid from any stage; re-enters
    /// SetUp and resets the period counters.
    pub fn set_up_sale(
        &mut self,
        caller: Address,
        round: Round,
        reserved: [u64; 3],
        rate: u64,
    ) -> Result<(), SaleError> {
        self.require_owner(caller)?;
        self.round = round;
        self.rate = rate;
        self.reserved = reserved;
        self.cap = 0;
        self.raised = 0;
        self.stage = Stage::SetUp;
        Ok(())
    }

    /// Open the configured round for contributions (owner only)
    pub fn start_sale(&mut self, caller: Address, cap: u64) -> Result<(), SaleError> {
        self.require_owner(caller)?;
        if self.stage != Stage::SetUp {
            return Err(SaleError::InvalidState {
                expected: Stage::SetUp,
                actual: self.stage,
            });
        }
        self.cap = cap;
        self.stage = Stage::Started;
        Ok(())
    }

    /// Close the running round (owner only)
    pub fn end_sale(&mut self, caller: Address) -> Result<(), SaleError> {
        self.require_owner(caller)?;
        if self.stage != Stage::Started {
            return Err(SaleError::InvalidState {
                expected: Stage::Started,
                actual: self.stage,
            });
        }
        self.stage = Stage::Ended;
        Ok(())
    }

    /// Admission check used by the purchase flow
    pub(crate) fn ensure_started(&self) -> Result<(), SaleError> {
        if self.stage != Stage::Started {
            return Err(SaleError::InvalidState {
                expected: Stage::Started,
                actual: self.stage,
            });
        }
        Ok(())
    }

    /// Count an accepted contribution against the cap
    pub(crate) fn accept_contribution(&mut self, amount: u64) -> Result<(), SaleError> {
        self.ensure_started()?;

        let new_raised = self
            .raised
            .checked_add(amount)
            .ok_or(SaleError::RaisedOverflow)?;
        if self.cap != 0 && new_raised > self.cap {
            return Err(SaleError::CapExceeded {
                cap: self.cap,
                raised: self.raised,
                attempted: amount,
            });
        }

        self.raised = new_raised;
        Ok(())
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn rate(&self) -> u64 {
        self.rate
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    pub fn raised(&self) -> u64 {
        self.raised
    }

    pub fn reserved(&self) -> [u64; 3] {
        self.reserved
    }
}
