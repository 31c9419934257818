// Snapshot codec - Portable textual encodings of engine snapshots

use crate::engine::SaleEngine;
use thiserror::Error;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to decode snapshot: {0}")]
    DecodeError(String),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid base64 string: {0}")]
    InvalidBase64(String),
}

/// Codec for moving engine snapshots between processes as text
pub struct SnapshotCodec;

impl SnapshotCodec {
    /// Encode an engine to binary bytes
    pub fn encode(engine: &SaleEngine) -> Vec<u8> {
        engine.to_bytes()
    }

    /// Decode an engine from binary bytes
    pub fn decode(bytes: &[u8]) -> Result<SaleEngine, CodecError> {
        SaleEngine::from_bytes(bytes).map_err(|e| CodecError::DecodeError(e.to_string()))
    }

    /// Encode to hex string
    pub fn encode_hex(engine: &SaleEngine) -> String {
        hex::encode(Self::encode(engine))
    }

    /// Decode from hex string
    pub fn decode_hex(hex_str: &str) -> Result<SaleEngine, CodecError> {
        let bytes = hex::decode(hex_str).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        Self::decode(&bytes)
    }

    /// Encode to base64 string (URL-safe, no padding)
    pub fn encode_base64(engine: &SaleEngine) -> String {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        URL_SAFE_NO_PAD.encode(Self::encode(engine))
    }

    /// Decode from base64 string
    pub fn decode_base64(b64_str: &str) -> Result<SaleEngine, CodecError> {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        let bytes = URL_SAFE_NO_PAD
            .decode(b64_str)
            .map_err(|e| CodecError::InvalidBase64(e.to_string()))?;
        Self::decode(&bytes)
    }
}
