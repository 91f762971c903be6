//! Scan result value

use bytes::Bytes;

use crate::family::CardFamily;

/// Outcome of one scan attempt.
///
/// Immutable once returned; the caller owns it. `raw_data` is the ordered
/// concatenation of the fixed-size blocks read from the card.
#[derive(Debug, Clone)]
pub struct CardRecord {
    /// Card UID as upper-case hex (at most 7 bytes worth)
    pub uid: String,
    /// Classified card family
    pub family: CardFamily,
    /// Concatenated block bytes, in read order
    pub raw_data: Bytes,
    /// Whether the read completed successfully
    pub success: bool,
    /// Failure description when `success` is false
    pub error: Option<String>,
}

impl CardRecord {
    /// Record for a scan that saw no classifiable card
    pub(crate) fn empty() -> Self {
        Self {
            uid: String::new(),
            family: CardFamily::Unknown,
            raw_data: Bytes::new(),
            success: false,
            error: None,
        }
    }

    /// Successful read of `data` from a card of `family`
    pub(crate) fn successful(family: CardFamily, uid: String, data: Bytes) -> Self {
        Self {
            uid,
            family,
            raw_data: data,
            success: true,
            error: None,
        }
    }

    /// Classified card whose read failed or is unsupported
    pub(crate) fn failed(family: CardFamily, uid: String, message: impl Into<String>) -> Self {
        Self {
            uid,
            family,
            raw_data: Bytes::new(),
            success: false,
            error: Some(message.into()),
        }
    }

    /// Card data as an upper-case hex string, ready for the payload
    pub fn data_hex(&self) -> String {
        hex::encode_upper(&self.raw_data)
    }
}
