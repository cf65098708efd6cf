//! RFC6979 HMAC-SHA256 DRBG, keyed the same way libsecp256k1 keys its default nonce function:
//! `seckey || msg mod n || extra data (optional)`.

use bitcoin::hashes::{hmac, sha256, Hash, HashEngine};
use k256::Scalar;

use crate::secp::{scalar_from_bytes, scalar_reduce, scalar_to_bytes};

/// HMAC-SHA256 deterministic random bit generator (RFC6979 section 3.2).
pub(crate) struct HmacDrbg {
    k: [u8; 32],
    v: [u8; 32],
    retry: bool,
}

fn hmac(key: &[u8; 32], chunks: &[&[u8]]) -> [u8; 32] {
    let mut engine = hmac::HmacEngine::<sha256::Hash>::new(key);
    for chunk in chunks {
        engine.input(chunk);
    }
    hmac::Hmac::<sha256::Hash>::from_engine(engine).to_byte_array()
}

impl HmacDrbg {
    pub(crate) fn new(seed: &[u8]) -> Self {
        let mut v = [0x01; 32];
        let mut k = [0x00; 32];

        k = hmac(&k, &[&v, &[0x00], seed]);
        v = hmac(&k, &[&v]);
        k = hmac(&k, &[&v, &[0x01], seed]);
        v = hmac(&k, &[&v]);

        Self { k, v, retry: false }
    }

    pub(crate) fn generate(&mut self) -> [u8; 32] {
        if self.retry {
            self.k = hmac(&self.k, &[&self.v, &[0x00]]);
            self.v = hmac(&self.k, &[&self.v]);
        }
        self.v = hmac(&self.k, &[&self.v]);
        self.retry = true;
        self.v
    }
}

impl Drop for HmacDrbg {
    fn drop(&mut self) {
        self.k = [0; 32];
        self.v = [0; 32];
    }
}

/// Derives the deterministic ECDSA nonce for `seckey` over `digest`, mixing in `extra` when
/// present. Candidates that are zero or not below the group order are skipped.
pub(crate) fn nonce(seckey: &[u8; 32], digest: &[u8; 32], extra: Option<&[u8; 32]>) -> Scalar {
    let msg = scalar_to_bytes(&scalar_reduce(digest));

    let mut keydata = [0u8; 96];
    keydata[..32].copy_from_slice(seckey);
    keydata[32..64].copy_from_slice(&msg);
    let len = match extra {
        Some(extra) => {
            keydata[64..].copy_from_slice(extra);
            96
        }
        None => 64,
    };

    let mut drbg = HmacDrbg::new(&keydata[..len]);

    loop {
        if let Some(k) = scalar_from_bytes(&drbg.generate()) {
            return k;
        }
    }
}
