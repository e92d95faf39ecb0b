//! Flash blob encoding.
//!
//! A flashed store is written to the session as one opaque blob:
//!
//! ```text
//! [magic "FBK\0"][version u8][payload_len u32 LE][payload][crc32 u32 LE]
//! ```
//!
//! The payload is the MessagePack encoding of the store's ordered groups, so
//! every key, every message and both orderings survive the round trip.

use crate::error::{FeedbackError, Result};
use crate::messages::{MessageGroup, MessageStore};
use serde::{Deserialize, Serialize};

/// Magic bytes for flash blobs.
const FLASH_MAGIC: &[u8; 4] = b"FBK\0";

/// Current flash blob format version.
const FLASH_VERSION: u8 = 1;

/// Magic + version + payload length.
const HEADER_LEN: usize = 9;

const CHECKSUM_LEN: usize = 4;

#[derive(Serialize, Deserialize)]
struct FlashPayload {
    groups: Vec<MessageGroup>,
}

/// Serialize the whole store into a flash blob.
pub fn encode(store: &MessageStore) -> Result<Vec<u8>> {
    let payload = rmp_serde::to_vec(&FlashPayload {
        groups: store.to_groups(),
    })?;

    let payload_len = u32::try_from(payload.len())
        .map_err(|_| FeedbackError::Serialization("flash payload too large".into()))?;

    let mut blob = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
    blob.extend_from_slice(FLASH_MAGIC);
    blob.push(FLASH_VERSION);
    blob.extend_from_slice(&payload_len.to_le_bytes());
    blob.extend_from_slice(&payload);

    let checksum = crc32fast::hash(&payload);
    blob.extend_from_slice(&checksum.to_le_bytes());

    Ok(blob)
}

/// Restore a store from a flash blob.
///
/// Every way a blob can be unreadable is reported as
/// [`FeedbackError::Deserialization`].
pub fn decode(blob: &[u8]) -> Result<MessageStore> {
    if blob.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(FeedbackError::Deserialization("flash blob truncated".into()));
    }

    if &blob[..4] != FLASH_MAGIC {
        return Err(FeedbackError::Deserialization("invalid flash magic".into()));
    }

    if blob[4] != FLASH_VERSION {
        return Err(FeedbackError::Deserialization(format!(
            "unsupported flash version: {}",
            blob[4]
        )));
    }

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&blob[5..HEADER_LEN]);
    let payload_len = u32::from_le_bytes(len_bytes) as usize;

    if blob.len() != HEADER_LEN + payload_len + CHECKSUM_LEN {
        return Err(FeedbackError::Deserialization(format!(
            "flash blob length mismatch: payload claims {} bytes, blob has {}",
            payload_len,
            blob.len()
        )));
    }

    let payload = &blob[HEADER_LEN..HEADER_LEN + payload_len];

    let mut checksum_bytes = [0u8; 4];
    checksum_bytes.copy_from_slice(&blob[HEADER_LEN + payload_len..]);
    let stored_checksum = u32::from_le_bytes(checksum_bytes);
    let computed_checksum = crc32fast::hash(payload);

    if stored_checksum != computed_checksum {
        return Err(FeedbackError::Deserialization(format!(
            "flash checksum mismatch: expected {}, got {}",
            stored_checksum, computed_checksum
        )));
    }

    let payload: FlashPayload = rmp_serde::from_slice(payload)?;
    Ok(MessageStore::from_groups(payload.groups))
}
