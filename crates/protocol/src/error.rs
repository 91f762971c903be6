//! Error types for the protocol engine
//!
//! Crypto errors are terminal for the current transaction. A response
//! signature *mismatch* is not an error here; it is reported through
//! [`crate::ApiResult::signature_valid`] by current contract. Malformed
//! responses become structured failure results, not faults.

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for protocol operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A key material file could not be read
    #[error("key file unreadable: {0}")]
    KeyFile(#[from] std::io::Error),

    /// Key material was present but could not be parsed
    #[error("key material parse failure: {0}")]
    KeyParse(String),

    /// The requested signing algorithm identifier is not recognized
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signing was requested before a private key was loaded
    #[error("private key not loaded")]
    PrivateKeyMissing,

    /// Verification was requested before a public key was loaded
    #[error("public key not loaded")]
    PublicKeyMissing,

    /// The signing computation itself failed
    #[error("signing failure: {0}")]
    Signing(String),

    /// The verification computation could not be carried out
    /// (bad base64, malformed signature bytes)
    #[error("signature verification could not be computed: {0}")]
    VerificationComputation(String),

    /// Network-level failure reported by the transport
    #[error("network error: {0}")]
    Transport(String),

    /// An epoch value outside the representable timestamp range
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}
