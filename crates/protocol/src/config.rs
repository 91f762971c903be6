//! Immutable configuration values
//!
//! Supplied by the caller's configuration layer at construction time and
//! never mutated afterwards; the protocol engine has no global state.

use std::time::Duration;

/// Fare-processing API endpoint settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Submission URL
    pub url: String,
    /// Exchange timeout in milliseconds
    pub timeout_ms: u64,
}

impl ApiConfig {
    /// Exchange timeout as a [`Duration`]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_ms: 30_000,
        }
    }
}

/// Device identity strings carried as request headers
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    /// `Device` header
    pub device: String,
    /// `Afcs-Code` header
    pub afcs_code: String,
    /// `Version-Number` header
    pub version_number: String,
    /// `Agent-Code` header
    pub agent_code: String,
    /// `Cashier-Code` header
    pub cashier_code: String,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            device: "CDB4V2".into(),
            afcs_code: "TOM650".into(),
            version_number: "1.0.0".into(),
            agent_code: "AGNT011".into(),
            cashier_code: "manualc".into(),
        }
    }
}

/// Tap payload parameters from configuration
#[derive(Debug, Clone)]
pub struct TapParams {
    /// Fare media code
    pub fare_media_code: String,
    /// Station code
    pub station_code: String,
    /// Tap channel name
    pub tap_channel: String,
    /// Card type identifier
    pub card_type_id: i32,
}

impl Default for TapParams {
    fn default() -> Self {
        Self {
            fare_media_code: "NCD01".into(),
            station_code: "VKZ123".into(),
            tap_channel: "One".into(),
            card_type_id: 1,
        }
    }
}

/// Localized status messages for the presentation layer.
///
/// Opaque to the protocol engine; carried here so one configuration value
/// can travel with the rest.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    /// Prompt while waiting for a card
    pub scanning: String,
    /// Sector authentication rejected
    pub auth_failed: String,
    /// Card read failed
    pub read_failed: String,
    /// Card read and tap accepted
    pub success: String,
    /// Service unreachable or rejected the exchange
    pub api_error: String,
    /// Submission in progress
    pub processing: String,
}
