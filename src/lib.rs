//! crowdmint - a deterministic token ledger with a multi-round,
//! whitelist-gated crowdsale engine.
//!
//! The [`engine::SaleEngine`] is the single mutating surface: it owns the
//! token ledger, the round/stage controller, the whitelist, and the
//! allocation registry, and it wraps every operation in a commit-or-discard
//! boundary so the first violated precondition leaves no trace. Callers are
//! opaque [`identity::Address`] values asserted by the embedding host.
//!
//! ```
//! use crowdmint::{Address, EngineConfig, Round, SaleEngine};
//!
//! let owner = Address::from_label("owner");
//! let admin = Address::from_label("admin");
//! let fund = Address::from_label("fund");
//! let buyer = Address::from_label("buyer");
//!
//! let config = EngineConfig::new(owner, admin, fund)
//!     .with_total_supply(1_000_000)
//!     .with_sale_allocation(400_000);
//! let mut engine = SaleEngine::new(config)?;
//!
//! engine.fund_sale(owner, 0)?;
//! engine.set_up_sale(owner, Round::PreSale, [0; 3], 2_000)?;
//! engine.start_sale(owner, 0)?;
//! engine.add_to_whitelist(owner, buyer)?;
//!
//! let receipt = engine.purchase(buyer, 10)?;
//! assert_eq!(receipt.token_amount(), 20_000);
//! assert_eq!(engine.balance_of(buyer), 20_000);
//! assert_eq!(engine.raised(), 10);
//! # Ok::<(), crowdmint::EngineError>(())
//! ```

pub mod engine;
pub mod identity;
pub mod ledger;
pub mod sale;
pub mod storage;

pub use engine::{EngineConfig, EngineError, EngineEvent, PurchaseReceipt, SaleEngine};
pub use identity::Address;
pub use sale::{Round, Stage};
