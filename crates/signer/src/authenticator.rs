//! The signer the wallet session talks to.
//!
//! [`Signer`] is generic over the network [`Variant`]; [`SoftwareSigner`] picks the variant from
//! the network name once, at construction, and dispatches to it.

use secp256k1::{PublicKey, SecretKey};
use soft_signer_key_deriv::{path_from_indices, KeyDeriver, MasterBlindingKey, SeedStore};
use soft_signer_proto::{
    Authenticator, DeviceInfo, MessageSignature, MessageSigningRequest, TransactionSignatures,
    TransactionSigningRequest,
};
use tracing::info;

use crate::{
    message,
    tx,
    variant::{Bitcoin, Elements, Variant},
    SignerError,
};

/// Network names containing this marker run the confidential variant.
pub const CONFIDENTIAL_NETWORK_MARKER: &str = "liquid";

/// Whether `network` names a confidential network.
pub fn is_confidential_network(network: &str) -> bool {
    network.contains(CONFIDENTIAL_NETWORK_MARKER)
}

/// A software signer for one network variant.
#[derive(Debug)]
pub struct Signer<V> {
    seeds: SeedStore,
    keys: KeyDeriver,
    variant: V,
}

impl<V: Variant> Signer<V> {
    fn with_variant(seeds: SeedStore, variant: V) -> Result<Self, SignerError> {
        let keys = KeyDeriver::new(&seeds)?;
        info!(
            fingerprint = %keys.master_fingerprint(),
            confidential = V::CONFIDENTIAL,
            "signer ready"
        );
        Ok(Self {
            seeds,
            keys,
            variant,
        })
    }

    /// The wallet's mnemonic store.
    pub const fn seed_store(&self) -> &SeedStore {
        &self.seeds
    }

    /// The wallet's key deriver.
    pub const fn keys(&self) -> &KeyDeriver {
        &self.keys
    }

    /// The network variant.
    pub const fn variant(&self) -> &V {
        &self.variant
    }
}

impl Signer<Bitcoin> {
    /// A signer for plain Bitcoin networks.
    pub fn plain(seeds: SeedStore) -> Result<Self, SignerError> {
        Self::with_variant(seeds, Bitcoin)
    }
}

impl Signer<Elements> {
    /// A signer for confidential networks.
    pub fn confidential(seeds: SeedStore) -> Result<Self, SignerError> {
        let variant = Elements::new(&seeds.seed());
        Self::with_variant(seeds, variant)
    }

    /// The SLIP-77 master blinding key.
    pub const fn master_blinding_key(&self) -> &MasterBlindingKey {
        self.variant.master_blinding_key()
    }

    /// Blinding private key for outputs paying to `script_pubkey`.
    pub fn private_blinding_key(&self, script_pubkey: &[u8]) -> Result<SecretKey, SignerError> {
        Ok(self
            .master_blinding_key()
            .private_blinding_key(script_pubkey)?)
    }

    /// Blinding public key for outputs paying to `script_pubkey`.
    pub fn public_blinding_key(&self, script_pubkey: &[u8]) -> Result<PublicKey, SignerError> {
        Ok(self
            .master_blinding_key()
            .public_blinding_key(script_pubkey)?)
    }

    /// Nonce shared with the holder of `pubkey` for outputs paying to `script_pubkey`.
    pub fn shared_nonce(
        &self,
        pubkey: &PublicKey,
        script_pubkey: &[u8],
    ) -> Result<[u8; 32], SignerError> {
        Ok(self
            .master_blinding_key()
            .shared_nonce(pubkey, script_pubkey)?)
    }
}

impl<V: Variant> Authenticator for Signer<V> {
    type Error = SignerError;

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo::software(V::CONFIDENTIAL)
    }

    fn get_xpub(&self, path: &[u32]) -> Result<String, SignerError> {
        Ok(self.keys.xpub(&path_from_indices(path))?)
    }

    fn sign_message(
        &self,
        request: &MessageSigningRequest,
    ) -> Result<MessageSignature, SignerError> {
        message::sign_message(&self.keys, request)
    }

    fn sign_transaction(
        &self,
        request: &TransactionSigningRequest,
    ) -> Result<TransactionSignatures, SignerError> {
        tx::sign_transaction(&self.variant, &self.keys, request)
    }
}

/// A software signer for whichever variant the network needs.
#[derive(Debug)]
pub enum SoftwareSigner {
    /// Plain Bitcoin networks.
    Plain(Signer<Bitcoin>),

    /// Confidential (Liquid) networks.
    Confidential(Signer<Elements>),
}

impl SoftwareSigner {
    /// Creates a signer for `network` around an existing mnemonic.
    pub fn new(network: &str, seeds: SeedStore) -> Result<Self, SignerError> {
        if is_confidential_network(network) {
            Ok(Self::Confidential(Signer::confidential(seeds)?))
        } else {
            Ok(Self::Plain(Signer::plain(seeds)?))
        }
    }

    /// Creates a signer for `network` around a freshly generated mnemonic of `word_count` words.
    pub fn create(network: &str, word_count: usize) -> Result<Self, SignerError> {
        Self::new(network, SeedStore::create(word_count)?)
    }

    /// The wallet's mnemonic store.
    pub const fn seed_store(&self) -> &SeedStore {
        match self {
            Self::Plain(signer) => signer.seed_store(),
            Self::Confidential(signer) => signer.seed_store(),
        }
    }

    /// The confidential signer, on confidential networks.
    pub const fn as_confidential(&self) -> Option<&Signer<Elements>> {
        match self {
            Self::Plain(_) => None,
            Self::Confidential(signer) => Some(signer),
        }
    }
}

impl Authenticator for SoftwareSigner {
    type Error = SignerError;

    fn device_info(&self) -> DeviceInfo {
        match self {
            Self::Plain(signer) => signer.device_info(),
            Self::Confidential(signer) => signer.device_info(),
        }
    }

    fn get_xpub(&self, path: &[u32]) -> Result<String, SignerError> {
        match self {
            Self::Plain(signer) => signer.get_xpub(path),
            Self::Confidential(signer) => signer.get_xpub(path),
        }
    }

    fn sign_message(
        &self,
        request: &MessageSigningRequest,
    ) -> Result<MessageSignature, SignerError> {
        match self {
            Self::Plain(signer) => signer.sign_message(request),
            Self::Confidential(signer) => signer.sign_message(request),
        }
    }

    fn sign_transaction(
        &self,
        request: &TransactionSigningRequest,
    ) -> Result<TransactionSignatures, SignerError> {
        match self {
            Self::Plain(signer) => signer.sign_transaction(request),
            Self::Confidential(signer) => signer.sign_transaction(request),
        }
    }
}
