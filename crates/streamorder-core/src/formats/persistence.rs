//! # Snapshot Format
//!
//! Binary serialization for river networks, including any resolved orders.
//!
//! Format: Header (5 bytes) + postcard-serialized network data.
//! - 4 bytes: Magic ("STRM")
//! - 1 byte: Version
//!
//! Sizes are validated before the payload is decoded, so a corrupted or
//! hostile snapshot cannot force a huge allocation.

use crate::{Network, SerializableNetwork, StreamOrderError, primitives};

/// Maximum allowed snapshot size in bytes (500 MB).
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 500 * 1024 * 1024;

/// Header length in bytes.
pub const HEADER_LEN: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The snapshot header precedes all network data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), StreamOrderError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(StreamOrderError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(StreamOrderError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StreamOrderError> {
        let (magic, version) = match bytes {
            [m0, m1, m2, m3, version, ..] => ([*m0, *m1, *m2, *m3], *version),
            _ => {
                return Err(StreamOrderError::DeserializationError(
                    "Header too short".to_string(),
                ));
            }
        };
        Ok(Self { magic, version })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether `bytes` start with the snapshot magic.
#[must_use]
pub fn is_snapshot(bytes: &[u8]) -> bool {
    bytes.starts_with(primitives::MAGIC_BYTES)
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a network to bytes (header + payload).
pub fn network_to_bytes(network: &Network) -> Result<Vec<u8>, StreamOrderError> {
    let header = PersistenceHeader::new();
    let serializable = SerializableNetwork::from(network);

    let payload = postcard::to_stdvec(&serializable)
        .map_err(|e| StreamOrderError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_LEN + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a network from bytes.
///
/// Validates, in order: minimum size, maximum size, header, arc count, and
/// arc index contiguity.
pub fn network_from_bytes(bytes: &[u8]) -> Result<Network, StreamOrderError> {
    if bytes.len() < HEADER_LEN {
        return Err(StreamOrderError::DeserializationError(format!(
            "Data too short: minimum {} bytes required",
            HEADER_LEN
        )));
    }

    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(StreamOrderError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = bytes.get(HEADER_LEN..).unwrap_or_default();
    let serializable: SerializableNetwork = postcard::from_bytes(payload).map_err(|e| {
        StreamOrderError::DeserializationError(format!("Failed to decode network data: {}", e))
    })?;

    if serializable.arcs.len() > primitives::MAX_ARC_COUNT {
        return Err(StreamOrderError::DeserializationError(format!(
            "Arc count {} exceeds maximum {}",
            serializable.arcs.len(),
            primitives::MAX_ARC_COUNT
        )));
    }

    Network::try_from(serializable)
}

// =============================================================================
// TESTS
// =============================================================================
