// Sale module - ROUNDS, ADMISSION, AND GRANT CAPS
// Handles the stage machine, whitelist gating, and pre-sale allocation caps

mod allocation;
mod controller;
mod whitelist;

pub use allocation::{AllocationError, AllocationRegistry};
pub use controller::{Round, SaleController, SaleError, Stage};
pub use whitelist::{Whitelist, WhitelistError};
