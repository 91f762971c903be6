//! Shared RSA test key, generated once per test binary

use std::sync::LazyLock;

use rsa::RsaPrivateKey;

use crate::keys::KeyStore;
use crate::sign::SignatureEngine;

pub(crate) static TEST_KEY: LazyLock<RsaPrivateKey> = LazyLock::new(|| {
    RsaPrivateKey::new(&mut rand_v8::thread_rng(), 2048).expect("test key generation")
});

pub(crate) fn test_engine() -> SignatureEngine {
    let mut keys = KeyStore::new();
    keys.set_private_key(TEST_KEY.clone());
    keys.set_public_key(TEST_KEY.to_public_key());
    SignatureEngine::new(keys)
}
