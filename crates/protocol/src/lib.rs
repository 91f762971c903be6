//! Signed fare-media tap protocol engine
//!
//! Builds the canonical transaction payload for a card tap, signs its
//! exact serialized bytes with RSA PKCS#1 v1.5, exchanges the signed
//! envelope with the fare-processing service, and validates the signed
//! response:
//!
//! - [`TransactionSigner`] serializes [`TransactionPayload`] with a fixed
//!   field order and signs the literal byte sequence.
//! - [`extract_data_json`] recovers the verbatim payload substring from
//!   the raw response text, because what was signed is the transmitted
//!   bytes, never a re-serialization.
//! - [`ResponseVerifier`] verifies the response signature (warn-only by
//!   contract) and decodes the business fields into [`ApiResult`].
//! - [`TapClient`] ties signer, transport, and verifier together for one
//!   tap transaction at a time.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
mod extract;
pub mod keys;
pub mod payload;
pub mod sign;
pub mod transport;
pub mod verify;

#[cfg(test)]
pub(crate) mod testkeys;

pub use client::TapClient;
pub use config::{ApiConfig, DeviceIdentity, Messages, TapParams};
pub use envelope::SignedEnvelope;
pub use error::{Error, Result};
pub use extract::extract_data_json;
pub use keys::{KeyStore, SignatureScheme};
pub use payload::{TRANSACTION_ID_PREFIX, Timestamp, TransactionPayload};
pub use sign::{SignatureEngine, TransactionSigner};
pub use transport::{HttpReply, HttpRequest, HttpTransport, Transport};
pub use verify::{ApiResult, ResponseVerifier};
