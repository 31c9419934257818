// Identity module - ACCOUNT ADDRESSES
// Handles opaque caller identities asserted by the embedding host

mod address;

pub use address::{Address, AddressError};
