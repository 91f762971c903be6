//! Error types for reader operations

/// Result type for reader operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by a concrete reader driver.
///
/// Anything other than a clean status byte from the device surfaces here
/// or as [`Error::DeviceStatus`]; both are terminal for the current scan
/// attempt and never retried at this layer.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// I/O failure talking to the coupler device
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Device-level failure with a driver-specific diagnostic
    #[error("device error: {0}")]
    Device(String),

    /// The coupler did not become ready in time
    #[error("coupler not ready")]
    NotReady,
}

/// Error type for scanner and read-strategy operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying driver failure
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// The device answered with a nonzero status byte
    #[error("{op} failed with device status {status:#04x}")]
    DeviceStatus {
        /// Operation that produced the status
        op: &'static str,
        /// Raw device status byte
        status: u8,
    },

    /// Keyed sector authentication was rejected
    #[error("authentication failed for sector {sector}")]
    AuthenticationFailed {
        /// Sector that failed to authenticate
        sector: u8,
    },

    /// A block or page group read failed
    #[error("failed to read block {block}")]
    ReadFailed {
        /// Block index that failed
        block: u8,
    },

    /// No classifiable card was presented before the deadline
    #[error("timed out waiting for a card")]
    Timeout,

    /// Authentication key material was malformed
    #[error("invalid authentication key: {0}")]
    InvalidKey(String),
}
