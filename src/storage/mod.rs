// Storage module - PERSISTENCE
// Handles persistent engine snapshots using sled

mod codec;
mod store;

pub use codec::{CodecError, SnapshotCodec};
pub use store::{EngineStore, StoreError, StorageStats};
