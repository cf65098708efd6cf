//! SLIP-77 confidential blinding keys.
//!
//! ```text
//! Seed
//! └── SLIP-21 node "SLIP-0077" ─── master blinding key (32 bytes)
//!     └── HMAC-SHA256(master, scriptPubKey) ─── per-script blinding private key
//! ```

use std::fmt;

use bitcoin::{
    hashes::{hmac, sha256, sha512, Hash, HashEngine},
    secp256k1::{ecdh::SharedSecret, PublicKey, SecretKey},
};
use secp256k1::SECP256K1;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{DerivationError, Seed};

/// HMAC key of the SLIP-21 root node.
const SLIP21_ROOT_KEY: &[u8] = b"Symmetric key seed";

/// SLIP-21 label of the SLIP-77 blinding branch.
const SLIP77_LABEL: &[u8] = b"SLIP-0077";

/// The SLIP-77 master blinding key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterBlindingKey([u8; 32]);

impl MasterBlindingKey {
    /// Derives the master blinding key from a BIP39 seed.
    pub fn from_seed(seed: &Seed) -> Self {
        let mut engine = hmac::HmacEngine::<sha512::Hash>::new(SLIP21_ROOT_KEY);
        engine.input(seed.as_bytes());
        let mut root = hmac::Hmac::<sha512::Hash>::from_engine(engine).to_byte_array();

        // child = HMAC-SHA512(key = parent chain code, 0x00 || label)
        let mut engine = hmac::HmacEngine::<sha512::Hash>::new(&root[..32]);
        engine.input(&[0x00]);
        engine.input(SLIP77_LABEL);
        let mut node = hmac::Hmac::<sha512::Hash>::from_engine(engine).to_byte_array();

        let mut key = [0u8; 32];
        key.copy_from_slice(&node[32..]);
        root.zeroize();
        node.zeroize();
        Self(key)
    }

    /// Raw key bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Blinding private key for outputs paying to `script_pubkey`.
    pub fn private_blinding_key(
        &self,
        script_pubkey: &[u8],
    ) -> Result<SecretKey, DerivationError> {
        let mut engine = hmac::HmacEngine::<sha256::Hash>::new(&self.0);
        engine.input(script_pubkey);
        let digest = hmac::Hmac::<sha256::Hash>::from_engine(engine).to_byte_array();
        Ok(SecretKey::from_slice(&digest)?)
    }

    /// Blinding public key for outputs paying to `script_pubkey`.
    pub fn public_blinding_key(
        &self,
        script_pubkey: &[u8],
    ) -> Result<PublicKey, DerivationError> {
        Ok(self
            .private_blinding_key(script_pubkey)?
            .public_key(SECP256K1))
    }

    /// Nonce shared with the holder of `their_pubkey`, used to unblind outputs sent to
    /// `script_pubkey`.
    pub fn shared_nonce(
        &self,
        their_pubkey: &PublicKey,
        script_pubkey: &[u8],
    ) -> Result<[u8; 32], DerivationError> {
        let ours = self.private_blinding_key(script_pubkey)?;
        let shared = SharedSecret::new(their_pubkey, &ours);
        Ok(sha256::Hash::hash(&shared.secret_bytes()).to_byte_array())
    }
}

impl fmt::Debug for MasterBlindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterBlindingKey(..)")
    }
}
