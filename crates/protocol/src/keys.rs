//! Key material loading
//!
//! The private signing key arrives in a password-protected PKCS#12
//! container; the public verification key is extracted from a PEM-encoded
//! X.509 certificate. Both are loaded once at startup and read-only for
//! the rest of the process lifetime.

use std::path::Path;
use std::str::FromStr;

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::info;
use x509_cert::Certificate;
use x509_cert::der::{DecodePem, Encode};

use crate::error::{Error, Result};

/// Signature scheme identifiers accepted by the signer.
///
/// The serving side is fixed to SHA-1 for response signatures; requests
/// may use either scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// SHA-1 digest with RSA PKCS#1 v1.5
    Sha1WithRsa,
    /// SHA-256 digest with RSA PKCS#1 v1.5
    Sha256WithRsa,
}

impl SignatureScheme {
    /// Canonical algorithm identifier string
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha1WithRsa => "SHA1withRSA",
            Self::Sha256WithRsa => "SHA256withRSA",
        }
    }
}

impl FromStr for SignatureScheme {
    type Err = Error;

    /// Parse an algorithm identifier, case-insensitively
    fn from_str(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case("SHA1withRSA") {
            Ok(Self::Sha1WithRsa)
        } else if name.eq_ignore_ascii_case("SHA256withRSA") {
            Ok(Self::Sha256WithRsa)
        } else {
            Err(Error::UnsupportedAlgorithm(name.to_owned()))
        }
    }
}

/// Holder for the signing and verification keys
#[derive(Debug, Default, Clone)]
pub struct KeyStore {
    private_key: Option<RsaPrivateKey>,
    public_key: Option<RsaPublicKey>,
}

impl KeyStore {
    /// Empty key store; keys are loaded with the `load_*` methods
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the private signing key from a PKCS#12 container
    pub fn load_private_pkcs12(&mut self, path: &Path, password: &str) -> Result<()> {
        let der = std::fs::read(path)?;
        let pfx = p12::PFX::parse(&der)
            .map_err(|e| Error::KeyParse(format!("PKCS#12 structure: {e:?}")))?;
        let bags = pfx
            .key_bags(password)
            .map_err(|e| Error::KeyParse(format!("PKCS#12 key bags: {e:?}")))?;
        let key_der = bags
            .first()
            .ok_or_else(|| Error::KeyParse("no private key in PKCS#12 container".into()))?;
        let key = RsaPrivateKey::from_pkcs8_der(key_der)
            .map_err(|e| Error::KeyParse(e.to_string()))?;
        self.private_key = Some(key);
        info!(path = %path.display(), "private certificate loaded");
        Ok(())
    }

    /// Load the public verification key from a PEM-encoded X.509
    /// certificate
    pub fn load_public_cert_pem(&mut self, path: &Path) -> Result<()> {
        let pem = std::fs::read(path)?;
        let cert = Certificate::from_pem(&pem).map_err(|e| Error::KeyParse(e.to_string()))?;
        let spki_der = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| Error::KeyParse(e.to_string()))?;
        let key = RsaPublicKey::from_public_key_der(&spki_der)
            .map_err(|e| Error::KeyParse(e.to_string()))?;
        self.public_key = Some(key);
        info!(path = %path.display(), "public certificate loaded");
        Ok(())
    }

    /// Provide the private key directly (tests, alternative provisioning)
    pub fn set_private_key(&mut self, key: RsaPrivateKey) {
        self.private_key = Some(key);
    }

    /// Provide the public key directly (tests, alternative provisioning)
    pub fn set_public_key(&mut self, key: RsaPublicKey) {
        self.public_key = Some(key);
    }

    pub(crate) fn private_key(&self) -> Result<&RsaPrivateKey> {
        self.private_key.as_ref().ok_or(Error::PrivateKeyMissing)
    }

    pub(crate) fn public_key(&self) -> Result<&RsaPublicKey> {
        self.public_key.as_ref().ok_or(Error::PublicKeyMissing)
    }
}
