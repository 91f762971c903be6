//! Reader driver capability trait
//!
//! The scanner talks to the coupler hardware exclusively through
//! [`ReaderDriver`], so a simulator can stand in for the device in tests.
//! Status byte `0` means success; any nonzero status is a hardware
//! failure for the operation that returned it.

use core::fmt;

use crate::error::{DriverError, Error, Result};

/// Fixed size of a MIFARE block (and of a 4-page Ultralight group)
pub const BLOCK_SIZE: usize = 16;

/// Reader key slot used for sector authentication
pub const KEY_SLOT: u8 = 0xFF;

/// Key type A selector for sector authentication
pub const KEY_TYPE_A: u8 = 0x0A;

/// 6-byte MIFARE sector key.
///
/// Loaded once from configuration and treated as read-only. The `Debug`
/// impl is redacted so key bytes never reach the logs.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AuthKey([u8; 6]);

impl AuthKey {
    /// Create a key from raw bytes
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Parse a key from its 12-character hex representation
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str).map_err(|e| Error::InvalidKey(e.to_string()))?;
        let bytes: [u8; 6] = bytes
            .try_into()
            .map_err(|_| Error::InvalidKey("expected exactly 6 key bytes".into()))?;
        Ok(Self(bytes))
    }

    /// Raw key bytes
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl Default for AuthKey {
    /// The transport-key default (all `0xFF`)
    fn default() -> Self {
        Self([0xFF; 6])
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthKey(..)")
    }
}

/// Card protocol families enabled for a search call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFamilies {
    /// MIFARE (Classic and Ultralight)
    pub mifare: bool,
    /// ISO 14443 type A
    pub iso_a: bool,
    /// ISO 14443 type B
    pub iso_b: bool,
    /// Innovatron (Calypso legacy)
    pub innovatron: bool,
    /// Ticketing chips
    pub ticket: bool,
    /// ST SRX memory tags
    pub srx: bool,
}

impl SearchFamilies {
    /// Enable every supported family
    pub const fn all() -> Self {
        Self {
            mifare: true,
            iso_a: true,
            iso_b: true,
            innovatron: true,
            ticket: true,
            srx: true,
        }
    }

    /// Disable every family
    pub const fn none() -> Self {
        Self {
            mifare: false,
            iso_a: false,
            iso_b: false,
            innovatron: false,
            ticket: false,
            srx: false,
        }
    }
}

/// A successful card detection from a search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Protocol/response code reported by the coupler
    pub protocol: u8,
    /// Leading response bytes (ATR); carries the UID for most families
    pub atr: Vec<u8>,
}

/// Result of a sector authentication call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthResult {
    /// Card type byte reported by the device
    pub card_type: u8,
    /// Card serial number bytes
    pub serial: [u8; 7],
    /// Device status byte (`0` = success)
    pub status: u8,
}

/// Capability interface to the contactless coupler.
///
/// Implementations own the device handle; the scanner requires `&mut`
/// access throughout a scan, which rules out concurrent use.
pub trait ReaderDriver {
    /// Search for a present card.
    ///
    /// Returns `Ok(None)` when no card answered within the device-side
    /// timeout (given in device units).
    fn search_card(
        &mut self,
        families: SearchFamilies,
        timeout_units: u8,
    ) -> core::result::Result<Option<Detection>, DriverError>;

    /// Load a sector key into the given reader key slot.
    ///
    /// Returns the device status byte.
    fn load_key(&mut self, slot: u8, key: &AuthKey) -> core::result::Result<u8, DriverError>;

    /// Authenticate a sector with a previously loaded key
    fn authenticate(
        &mut self,
        sector: u8,
        key_type: u8,
        slot: u8,
    ) -> core::result::Result<AuthResult, DriverError>;

    /// Read one fixed-size block (or 4-page group) of card memory
    fn read_block(&mut self, index: u8)
    -> core::result::Result<([u8; BLOCK_SIZE], u8), DriverError>;

    /// Reset the coupler RF field and search state
    fn reset(&mut self) -> core::result::Result<(), DriverError>;
}

/// Card access parameters supplied by the caller's configuration.
///
/// Built once and passed to the scanner at construction; there is no
/// global configuration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardConfig {
    /// Sector key A
    pub key_a: AuthKey,
    /// Sector to authenticate for keyed reads
    pub sector: u8,
    /// First block of the keyed read range
    pub start_block: u8,
    /// Last block of the keyed read range (inclusive)
    pub end_block: u8,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            key_a: AuthKey::default(),
            sector: 1,
            start_block: 4,
            end_block: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_key_from_hex() {
        let key = AuthKey::from_hex("A0A1A2A3A4A5").unwrap();
        assert_eq!(key.as_bytes(), &[0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5]);
    }

    #[test]
    fn auth_key_rejects_wrong_length() {
        assert!(matches!(
            AuthKey::from_hex("A0A1A2A3"),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(AuthKey::from_hex("zz"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn auth_key_debug_is_redacted() {
        let key = AuthKey::from_hex("A0A1A2A3A4A5").unwrap();
        assert_eq!(format!("{key:?}"), "AuthKey(..)");
    }
}
