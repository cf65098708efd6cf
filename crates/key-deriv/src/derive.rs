//! Per-path key derivation from the master key.
//!
//! [`KeyDeriver`] owns the master [`Xpriv`] and walks a [`DerivationPath`] on every call. Child
//! keys are not cached.

use bitcoin::{
    bip32::{self, ChildNumber, DerivationPath, Fingerprint, Xpriv, Xpub},
    secp256k1::{PublicKey, SecretKey},
};
use secp256k1::SECP256K1;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::SeedStore;

/// Error type for key derivation operations.
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    /// BIP32 derivation failed.
    #[error("BIP32 derivation error: {0}")]
    Bip32(#[from] bip32::Error),

    /// The mnemonic could not be encoded or parsed.
    #[error("BIP39 mnemonic error: {0}")]
    Bip39(#[from] bip39::Error),

    /// The OS entropy source failed.
    #[error("entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    /// The requested mnemonic length has no matching entropy length.
    #[error("unsupported mnemonic word count {0}")]
    InvalidWordCount(usize),

    /// A textual derivation path could not be parsed.
    #[error("invalid derivation path {0:?}")]
    InvalidPath(String),

    /// A derived blinding key is not a valid secret key.
    #[error("invalid blinding key: {0}")]
    BlindingKey(#[from] bitcoin::secp256k1::Error),
}

/// Derives private and public keys for arbitrary paths below the master key.
#[derive(Debug, Clone)]
pub struct KeyDeriver {
    /// The master [`Xpriv`] at `m`.
    master: Xpriv,
}

impl KeyDeriver {
    /// Creates a new [`KeyDeriver`] rooted at the master key of `store`.
    pub fn new(store: &SeedStore) -> Result<Self, DerivationError> {
        Ok(Self::from_master(store.master_key()?))
    }

    /// Creates a new [`KeyDeriver`] from an existing master [`Xpriv`].
    pub const fn from_master(master: Xpriv) -> Self {
        Self { master }
    }

    /// The master [`Xpriv`].
    pub const fn master(&self) -> &Xpriv {
        &self.master
    }

    /// Fingerprint of the master key.
    pub fn master_fingerprint(&self) -> Fingerprint {
        self.master.fingerprint(SECP256K1)
    }

    /// Derives the extended private key at `path`.
    ///
    /// The empty path returns the master key unchanged.
    pub fn derive(&self, path: &DerivationPath) -> Result<Xpriv, DerivationError> {
        if path.is_master() {
            return Ok(self.master);
        }
        Ok(self.master.derive_priv(SECP256K1, path)?)
    }

    /// Derives the key at `path` and renders its public half as a base58check string.
    pub fn xpub(&self, path: &DerivationPath) -> Result<String, DerivationError> {
        let xpriv = self.derive(path)?;
        Ok(Xpub::from_priv(SECP256K1, &xpriv).to_string())
    }

    /// Derives the raw private key at `path`.
    pub fn privkey(&self, path: &DerivationPath) -> Result<SecretKey, DerivationError> {
        Ok(self.derive(path)?.private_key)
    }

    /// Derives the public key at `path`.
    pub fn pubkey(&self, path: &DerivationPath) -> Result<PublicKey, DerivationError> {
        Ok(self.derive(path)?.private_key.public_key(SECP256K1))
    }
}

impl Drop for KeyDeriver {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Zeroize for KeyDeriver {
    #[inline]
    fn zeroize(&mut self) {
        let master = &mut self.master;

        // NOTE: `SecretKey::non_secure_erase` writes `1`s to the memory.
        master.depth.zeroize();
        {
            let fingerprint: &mut [u8; 4] = master.parent_fingerprint.as_mut();
            fingerprint.zeroize();
        }
        master.private_key.non_secure_erase();
        {
            let chaincode: &mut [u8; 32] = master.chain_code.as_mut();
            chaincode.zeroize();
        }
        master.child_number = ChildNumber::Normal { index: 0 };
    }
}

impl ZeroizeOnDrop for KeyDeriver {}

#[cfg(test)]
mod tests {
    use bitcoin::NetworkKind;
    use proptest::prelude::*;

    use super::*;
    use crate::{path_from_indices, HARDENED};

    fn deriver() -> KeyDeriver {
        KeyDeriver::from_master(Xpriv::new_master(NetworkKind::Test, &[7u8; 64]).unwrap())
    }

    #[test]
    fn empty_path_is_master() {
        let keys = deriver();
        let derived = keys.derive(&DerivationPath::master()).unwrap();
        assert_eq!(&derived, keys.master());
    }

    #[test]
    fn derivation_keeps_private_capability() {
        let keys = deriver();
        let path = path_from_indices(&[HARDENED | 44, HARDENED | 1, 0, 5]);
        let xpriv = keys.derive(&path).unwrap();
        assert_eq!(xpriv.depth, 4);
        assert_eq!(xpriv.child_number, ChildNumber::Normal { index: 5 });
        assert_eq!(
            keys.pubkey(&path).unwrap(),
            keys.privkey(&path).unwrap().public_key(SECP256K1)
        );
    }

    #[test]
    fn xpub_is_tpub() {
        let keys = deriver();
        let xpub = keys.xpub(&path_from_indices(&[HARDENED | 3])).unwrap();
        assert!(xpub.starts_with("tpub"), "{xpub}");
    }

    #[test]
    fn zeroize_wipes_master() {
        let mut keys = deriver();
        keys.zeroize();
        assert_eq!(keys.master().private_key.secret_bytes(), [1u8; 32]);
        assert_eq!(*keys.master().chain_code.as_bytes(), [0u8; 32]);
        assert_eq!(keys.master().depth, 0);
    }

    proptest! {
        #[test]
        fn xpub_recomputes_from_scratch(
            seed in proptest::array::uniform32(any::<u8>()),
            path in proptest::collection::vec(any::<u32>(), 0..=8),
        ) {
            let path = path_from_indices(&path);
            let first = KeyDeriver::from_master(Xpriv::new_master(NetworkKind::Test, &seed).unwrap());
            let second = KeyDeriver::from_master(Xpriv::new_master(NetworkKind::Test, &seed).unwrap());

            prop_assert_eq!(first.xpub(&path).unwrap(), second.xpub(&path).unwrap());
            prop_assert_eq!(first.xpub(&path).unwrap(), first.xpub(&path).unwrap());
        }
    }
}
