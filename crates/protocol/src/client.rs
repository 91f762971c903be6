//! Tap submission client
//!
//! Ties signer, transport, and verifier together for one transaction at a
//! time: build and sign the payload, exchange the envelope, validate and
//! decode the reply.

use std::sync::Arc;

use tracing::debug;

use crate::config::{ApiConfig, DeviceIdentity, TapParams};
use crate::envelope::SignedEnvelope;
use crate::error::Result;
use crate::keys::SignatureScheme;
use crate::sign::{SignatureEngine, TransactionSigner};
use crate::transport::{HttpRequest, Transport};
use crate::verify::{ApiResult, ResponseVerifier};

/// Client for submitting signed fare-media taps
#[derive(Debug)]
pub struct TapClient<T> {
    signer: TransactionSigner,
    verifier: ResponseVerifier,
    transport: T,
    api: ApiConfig,
    device: DeviceIdentity,
}

impl<T: Transport> TapClient<T> {
    /// Assemble a client from a loaded signature engine and configuration
    pub fn new(
        engine: Arc<SignatureEngine>,
        scheme: SignatureScheme,
        tap: TapParams,
        api: ApiConfig,
        device: DeviceIdentity,
        transport: T,
    ) -> Self {
        Self {
            signer: TransactionSigner::new(Arc::clone(&engine), scheme, tap),
            verifier: ResponseVerifier::new(engine),
            transport,
            api,
            device,
        }
    }

    /// Submit one card tap: sign, exchange, verify, decode.
    ///
    /// Crypto and network failures are `Err`; a reachable service always
    /// yields an [`ApiResult`], successful or not.
    pub fn send_card_tap(
        &self,
        card_number: &str,
        card_data_hex: &str,
        amount: f64,
    ) -> Result<ApiResult> {
        let envelope = self.signer.build_and_sign(card_number, card_data_hex, amount)?;
        self.send_envelope(&envelope)
    }

    /// Submit a pre-built envelope (used with injected timestamps)
    pub fn send_envelope(&self, envelope: &SignedEnvelope) -> Result<ApiResult> {
        let request = HttpRequest {
            url: self.api.url.clone(),
            headers: self.headers(),
            body: envelope.to_json(),
            timeout: self.api.timeout(),
        };
        debug!(url = %request.url, body = %request.body, "submitting tap");
        let reply = self.transport.exchange(&request)?;
        Ok(self.verifier.parse_and_verify(reply.status, &reply.body))
    }

    /// Access to the signer, for building envelopes with injected
    /// timestamps
    pub const fn signer(&self) -> &TransactionSigner {
        &self.signer
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".into(), "application/json".into()),
            ("Accept".into(), "application/json".into()),
            ("Device".into(), self.device.device.clone()),
            ("Afcs-Code".into(), self.device.afcs_code.clone()),
            ("Version-Number".into(), self.device.version_number.clone()),
            ("Agent-Code".into(), self.device.agent_code.clone()),
            ("Cashier-Code".into(), self.device.cashier_code.clone()),
        ]
    }
}
