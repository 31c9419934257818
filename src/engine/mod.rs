// Engine module - THE OPERATION SURFACE
// Handles every mutation behind a commit-or-discard boundary

mod config;
mod engine;
mod events;
mod funds;

pub use config::{EngineConfig, DEFAULT_SALE_ALLOCATION, DEFAULT_TOTAL_SUPPLY};
pub use engine::{EngineError, EngineStats, SaleEngine};
pub use events::EngineEvent;
pub use funds::{FundsLog, PurchaseReceipt};
