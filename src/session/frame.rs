//! On-disk framing of a single session value.
//!
//! ```text
//! [magic "FSV\0"][version u8][key_len u16 LE][key][value_len u64 LE][value][crc32 u32 LE of value]
//! ```
//!
//! The key is stored alongside the value so a file can be checked against the
//! key that was hashed into its name. Every malformed frame decodes to
//! [`FeedbackError::Deserialization`].

use crate::error::{FeedbackError, Result};

/// Magic bytes for session value files.
const VALUE_MAGIC: &[u8; 4] = b"FSV\0";

/// Current session value format version.
const VALUE_VERSION: u8 = 1;

const CHECKSUM_LEN: usize = 4;

/// Frame `value` stored under `key`.
pub(super) fn encode(key: &str, value: &[u8]) -> Result<Vec<u8>> {
    let key_bytes = key.as_bytes();
    let key_len = u16::try_from(key_bytes.len()).map_err(|_| {
        FeedbackError::Serialization(format!("session key too long: {} bytes", key_bytes.len()))
    })?;

    let mut frame = Vec::with_capacity(4 + 1 + 2 + key_bytes.len() + 8 + value.len() + CHECKSUM_LEN);
    frame.extend_from_slice(VALUE_MAGIC);
    frame.push(VALUE_VERSION);
    frame.extend_from_slice(&key_len.to_le_bytes());
    frame.extend_from_slice(key_bytes);
    frame.extend_from_slice(&(value.len() as u64).to_le_bytes());
    frame.extend_from_slice(value);
    frame.extend_from_slice(&crc32fast::hash(value).to_le_bytes());
    Ok(frame)
}

/// Unframe the value stored under `key`.
///
/// Lengths read from the frame are checked against the bytes actually
/// present before anything is sliced or copied.
pub(super) fn decode(key: &str, frame: &[u8]) -> Result<Vec<u8>> {
    let mut reader = FrameReader { rest: frame };

    if reader.take(VALUE_MAGIC.len())? != VALUE_MAGIC {
        return Err(FeedbackError::Deserialization("invalid session value magic".into()));
    }

    let version = reader.take(1)?[0];
    if version != VALUE_VERSION {
        return Err(FeedbackError::Deserialization(format!(
            "unsupported session value version: {}",
            version
        )));
    }

    let key_len = u16::from_le_bytes(reader.take_array()?) as usize;
    if reader.take(key_len)? != key.as_bytes() {
        return Err(FeedbackError::Deserialization(format!(
            "session value file does not belong to key {:?}",
            key
        )));
    }

    let value_len = u64::from_le_bytes(reader.take_array()?);
    let available = reader.rest.len().saturating_sub(CHECKSUM_LEN) as u64;
    if value_len > available {
        return Err(FeedbackError::Deserialization(
            "session value length exceeds file".into(),
        ));
    }
    let value = reader.take(value_len as usize)?;

    let stored_checksum = u32::from_le_bytes(reader.take_array()?);
    let computed_checksum = crc32fast::hash(value);
    if stored_checksum != computed_checksum {
        return Err(FeedbackError::Deserialization(format!(
            "session value checksum mismatch: expected {}, got {}",
            stored_checksum, computed_checksum
        )));
    }

    if !reader.rest.is_empty() {
        return Err(FeedbackError::Deserialization(format!(
            "{} trailing bytes after session value",
            reader.rest.len()
        )));
    }

    Ok(value.to_vec())
}

/// Bounds-checked cursor over a frame.
struct FrameReader<'a> {
    rest: &'a [u8],
}

impl<'a> FrameReader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.rest.len() {
            return Err(FeedbackError::Deserialization("session value truncated".into()));
        }
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        Ok(head)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }
}
