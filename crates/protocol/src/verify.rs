//! Response validation and decoding
//!
//! The response signature is checked against the verbatim payload
//! substring of the raw text. A mismatch is recorded and surfaced as a
//! warning signal but does not block decoding of the business fields —
//! that is the current contract with the serving side.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::extract::extract_data_json;
use crate::sign::SignatureEngine;

/// Two-letter status for an accepted tap
const STATUS_ACCEPTED: &str = "AS";

/// Numeric sub-code for an accepted tap
const STATUS_CODE_ACCEPTED: &str = "2101";

/// Decoded outcome of one tap submission.
///
/// `success` is a business-level judgment: it requires the accepted
/// status and sub-code, independent of transport success and of
/// signature verification.
#[derive(Debug, Clone, Default)]
pub struct ApiResult {
    /// Whether the service accepted the tap (`AS` / `2101`)
    pub success: bool,
    /// HTTP status of the exchange
    pub http_status: u16,
    /// Two-letter status code (`AS` accepted, `AF` failed)
    pub status: String,
    /// Numeric sub-code string (`2101` accepted)
    pub status_code: String,
    /// Service-provided message
    pub message: String,
    /// Transaction id echoed or assigned by the service
    pub transaction_id: String,
    /// Response signature check: `None` when it could not be attempted
    pub signature_valid: Option<bool>,
    /// Opaque nested tap detail for downstream use
    pub tap_detail: Value,
    /// The full decoded `data` object, preserved opaquely
    pub full_data: Value,
}

/// Validates and decodes raw service responses
#[derive(Debug, Clone)]
pub struct ResponseVerifier {
    engine: Arc<SignatureEngine>,
}

impl ResponseVerifier {
    /// Create a verifier over the shared signature engine
    pub fn new(engine: Arc<SignatureEngine>) -> Self {
        Self { engine }
    }

    /// Validate the signature and decode the business fields of a raw
    /// response body.
    ///
    /// Trailing transport artifacts after the last `}` are discarded
    /// first. Decoding failures yield a structured failure result, never
    /// a fault.
    pub fn parse_and_verify(&self, http_status: u16, body: &str) -> ApiResult {
        let trimmed = trim_transport_artifacts(body);
        if trimmed.len() != body.len() {
            debug!(
                original = body.len(),
                cleaned = trimmed.len(),
                "trimmed trailing bytes from response"
            );
        }

        let mut result = ApiResult {
            http_status,
            ..ApiResult::default()
        };

        let root = match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(root)) => root,
            _ => {
                result.message = "Invalid JSON response".into();
                return result;
            }
        };

        let signature = root
            .get("signature")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if let Some(data_json) = extract_data_json(trimmed) {
            if !signature.is_empty() {
                match self.engine.verify_signature(data_json, signature) {
                    Ok(valid) => {
                        result.signature_valid = Some(valid);
                        if !valid {
                            // Processing continues by current contract
                            warn!("response signature verification failed");
                        }
                    }
                    Err(error) => {
                        result.signature_valid = Some(false);
                        warn!(%error, "response signature could not be checked");
                    }
                }
            }
        }

        let data = root.get("data").cloned().unwrap_or(Value::Null);
        if let Some(obj) = data.as_object() {
            result.status = field(obj, "status");
            result.status_code = field(obj, "statusCode");
            result.message = field(obj, "message");
            result.transaction_id = field(obj, "transactionId");
            result.tap_detail = obj.get("fareMediaTap").cloned().unwrap_or(Value::Null);
            result.success =
                result.status == STATUS_ACCEPTED && result.status_code == STATUS_CODE_ACCEPTED;
        } else {
            result.message = "Invalid JSON response".into();
        }
        result.full_data = data;

        debug!(
            status = %result.status,
            status_code = %result.status_code,
            success = result.success,
            "response decoded"
        );
        result
    }
}

/// Cut everything after the last closing brace (chunked-encoding tails).
///
/// Defensive trim, not a protocol requirement; text without any brace
/// passes through untouched.
fn trim_transport_artifacts(body: &str) -> &str {
    match body.rfind('}') {
        Some(idx) => &body[..=idx],
        None => body,
    }
}

fn field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}
