//! Signing and verification over exact payload bytes

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer as _, Verifier as _};
use sha1::Sha1;
use sha2::Sha256;
use tracing::debug;

use crate::envelope::SignedEnvelope;
use crate::error::{Error, Result};
use crate::keys::{KeyStore, SignatureScheme};
use crate::payload::{Timestamp, TransactionPayload};

/// RSA PKCS#1 v1.5 signing and verification against a loaded [`KeyStore`].
///
/// One engine per process; shared read-only between the signer and the
/// verifier.
#[derive(Debug)]
pub struct SignatureEngine {
    keys: KeyStore,
}

impl SignatureEngine {
    /// Wrap a loaded key store
    pub fn new(keys: KeyStore) -> Self {
        Self { keys }
    }

    /// Sign the UTF-8 bytes of `data` and return the signature as base64
    /// without line breaks.
    ///
    /// Fails when no private key is loaded; the scheme was already
    /// validated at parse time.
    pub fn sign_data(&self, data: &str, scheme: SignatureScheme) -> Result<String> {
        let key = self.keys.private_key()?;
        let bytes = data.as_bytes();
        let signature = match scheme {
            SignatureScheme::Sha1WithRsa => SigningKey::<Sha1>::new(key.clone())
                .try_sign(bytes)
                .map_err(|e| Error::Signing(e.to_string()))?
                .to_vec(),
            SignatureScheme::Sha256WithRsa => SigningKey::<Sha256>::new(key.clone())
                .try_sign(bytes)
                .map_err(|e| Error::Signing(e.to_string()))?
                .to_vec(),
        };
        debug!(scheme = scheme.name(), len = signature.len(), "payload signed");
        Ok(BASE64.encode(signature))
    }

    /// Verify a base64 signature against the exact bytes of `data`.
    ///
    /// The serving side is fixed to SHA-1 with RSA PKCS#1 v1.5. Stray
    /// whitespace in the base64 text is removed before decoding.
    /// `Ok(false)` is a signature mismatch; `Err` means the check could
    /// not be computed at all.
    pub fn verify_signature(&self, data: &str, signature_b64: &str) -> Result<bool> {
        let key = self.keys.public_key()?;
        let cleaned: String = signature_b64
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let signature_bytes = BASE64
            .decode(cleaned)
            .map_err(|e| Error::VerificationComputation(e.to_string()))?;
        let signature = Signature::try_from(signature_bytes.as_slice())
            .map_err(|e| Error::VerificationComputation(e.to_string()))?;
        let verifying_key = VerifyingKey::<Sha1>::new(key.clone());
        Ok(verifying_key.verify(data.as_bytes(), &signature).is_ok())
    }
}

/// Builds the canonical payload for a tap and signs its exact bytes
#[derive(Debug, Clone)]
pub struct TransactionSigner {
    engine: Arc<SignatureEngine>,
    scheme: SignatureScheme,
    tap: crate::config::TapParams,
}

impl TransactionSigner {
    /// Create a signer using `scheme` for outbound requests
    pub fn new(
        engine: Arc<SignatureEngine>,
        scheme: SignatureScheme,
        tap: crate::config::TapParams,
    ) -> Self {
        Self {
            engine,
            scheme,
            tap,
        }
    }

    /// Build and sign a payload with a fresh timestamp sample
    pub fn build_and_sign(
        &self,
        card_number: &str,
        card_data_hex: &str,
        amount: f64,
    ) -> Result<SignedEnvelope> {
        self.build_and_sign_at(card_number, card_data_hex, amount, Timestamp::now())
    }

    /// Build and sign a payload with an injected timestamp.
    ///
    /// The timestamp is used verbatim for both time fields and the
    /// transaction id.
    pub fn build_and_sign_at(
        &self,
        card_number: &str,
        card_data_hex: &str,
        amount: f64,
        timestamp: Timestamp,
    ) -> Result<SignedEnvelope> {
        let payload = TransactionPayload {
            amount,
            card_data: card_data_hex.to_owned(),
            fare_media_code: self.tap.fare_media_code.clone(),
            card_number: card_number.to_owned(),
            station_code: self.tap.station_code.clone(),
            tap_channel: self.tap.tap_channel.clone(),
            card_type_id: self.tap.card_type_id,
            timestamp,
        };
        let data = payload.serialize();
        let signature = self.engine.sign_data(&data, self.scheme)?;
        Ok(SignedEnvelope { data, signature })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TapParams;
    use crate::testkeys::test_engine;

    #[test]
    fn sign_verify_round_trip_both_schemes() {
        let engine = test_engine();
        let data = r#"{"amount": 750,"cardData": "00112233"}"#;

        for scheme in [SignatureScheme::Sha1WithRsa, SignatureScheme::Sha256WithRsa] {
            let signature = engine.sign_data(data, scheme).unwrap();
            assert!(!signature.contains('\n'));
            if scheme == SignatureScheme::Sha1WithRsa {
                assert!(engine.verify_signature(data, &signature).unwrap());
            }
        }
    }

    #[test]
    fn verification_rejects_tampered_data() {
        let engine = test_engine();
        let data = r#"{"status":"AS"}"#;
        let signature = engine
            .sign_data(data, SignatureScheme::Sha1WithRsa)
            .unwrap();
        assert!(engine.verify_signature(data, &signature).unwrap());
        assert!(!engine
            .verify_signature(r#"{"status":"AF"}"#, &signature)
            .unwrap());
    }

    #[test]
    fn verification_tolerates_whitespace_in_base64() {
        let engine = test_engine();
        let data = "payload";
        let signature = engine
            .sign_data(data, SignatureScheme::Sha1WithRsa)
            .unwrap();
        let wrapped: String = signature
            .as_bytes()
            .chunks(16)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");
        assert!(engine.verify_signature(data, &wrapped).unwrap());
    }

    #[test]
    fn bad_base64_is_a_computation_error() {
        let engine = test_engine();
        assert!(matches!(
            engine.verify_signature("payload", "@@not base64@@"),
            Err(Error::VerificationComputation(_))
        ));
    }

    #[test]
    fn signing_without_private_key_fails() {
        let engine = SignatureEngine::new(KeyStore::new());
        assert!(matches!(
            engine.sign_data("data", SignatureScheme::Sha1WithRsa),
            Err(Error::PrivateKeyMissing)
        ));
    }

    #[test]
    fn signer_produces_deterministic_envelope_for_fixed_timestamp() {
        let engine = Arc::new(test_engine());
        let signer = TransactionSigner::new(
            Arc::clone(&engine),
            SignatureScheme::Sha1WithRsa,
            TapParams::default(),
        );
        let ts = Timestamp::from_epoch_ms(1_700_000_000_000).unwrap();

        let first = signer
            .build_and_sign_at("04A1B2C3", "00112233", 750.0, ts.clone())
            .unwrap();
        let second = signer
            .build_and_sign_at("04A1B2C3", "00112233", 750.0, ts)
            .unwrap();

        // PKCS#1 v1.5 is deterministic, so the whole envelope repeats
        assert_eq!(first, second);
        assert!(first.data.contains("\"transactionId\": \"afcs-tom1700000000000\""));
        assert!(engine.verify_signature(&first.data, &first.signature).unwrap());
    }
}
