//! Wire codec for readings.
//!
//! Each datagram carries exactly one JSON-encoded reading. Decoding is
//! total: any malformed, truncated, or mistyped input comes back as a
//! `DecodeError`, never a panic, since the bytes arrive straight off the
//! network.

use std::fmt;

use crate::Reading;

/// Result type alias for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors produced while decoding an inbound datagram
#[derive(Debug)]
pub enum DecodeError {
    /// Payload was not a valid encoded reading
    Malformed(String),

    /// Payload decoded but carried an empty agent id
    MissingAgentId,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed(msg) => write!(f, "malformed reading: {}", msg),
            DecodeError::MissingAgentId => write!(f, "reading has an empty agent id"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Encode a reading for transmission.
pub fn encode(reading: &Reading) -> Vec<u8> {
    // Serializing a plain struct with no maps or non-string keys cannot fail.
    serde_json::to_vec(reading).expect("reading serialization is infallible")
}

/// Decode a single datagram payload into a reading.
pub fn decode(bytes: &[u8]) -> DecodeResult<Reading> {
    let reading: Reading =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    if reading.agent_id.is_empty() {
        return Err(DecodeError::MissingAgentId);
    }

    Ok(reading)
}
