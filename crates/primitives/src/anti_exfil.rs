//! ECDSA Anti-Exfil signing (sign-to-contract over the nonce).
//!
//! With `d` the signing key and `m` the message digest:
//!
//! ```text
//! host                                    signer
//! ----                                    ------
//! e  <- 32 random bytes
//! c  = H_data(e)            ── c ──▶
//!                                          k  = RFC6979(d, m, extra = c)
//!                           ◀── R0 ──      R0 = k·G
//!                           ── e ──▶
//!                                          t  = H_point(R0 || e)
//!                                          k' = k + t
//!                           ◀── sig ──     sig = ECDSA(d, m, nonce = k')
//! check x(R0 + t·G) == r
//! ```
//!
//! `H_data` and `H_point` are tagged hashes with the `s2c/ecdsa/data` and `s2c/ecdsa/point`
//! tags, which keeps the output compatible with libsecp256k1-zkp's `ecdsa_s2c` module.
//!
//! A real hardware flow splits the two signer steps across two round trips. Here both host values
//! arrive in one request, so [`commit`] and [`Committed::sign`] run back to back; only the
//! [`SignerCommitment`] is observable from the intermediate state.

use std::fmt;

use k256::{ProjectivePoint, Scalar};
use secp256k1::{ecdsa::Signature, Message, PublicKey, SecretKey, SECP256K1};

use crate::{
    rfc6979,
    secp::{
        point_from_compressed, point_to_compressed, point_x_scalar, scalar_from_bytes,
        scalar_reduce, scalar_to_bytes, tagged_hash,
    },
};

/// Tag of the hash committing to the host entropy.
pub const S2C_DATA_TAG: &[u8] = b"s2c/ecdsa/data";

/// Tag of the hash tweaking the signer's nonce point.
pub const S2C_POINT_TAG: &[u8] = b"s2c/ecdsa/point";

/// Errors raised by the Anti-Exfil protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AntiExfilError {
    /// A protocol value had the wrong length.
    #[error("{what} must be {expected} bytes, got {got}")]
    InvalidLength {
        /// Which value was malformed.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// The signing key is not a valid secp256k1 scalar.
    #[error("invalid secret key")]
    InvalidSecretKey,

    /// The revealed host entropy does not open the host commitment received earlier.
    #[error("host entropy does not match the host commitment")]
    EntropyMismatch,

    /// The tweaked nonce, or the signature built from it, is degenerate.
    #[error("degenerate nonce")]
    InvalidNonce,

    /// The signer commitment is not a valid curve point.
    #[error("signer commitment is not a valid point")]
    InvalidCommitment,

    /// The signature's nonce is not the committed nonce tweaked by the host entropy.
    #[error("signature nonce does not match the signer commitment")]
    CommitmentMismatch,

    /// The signature does not verify against the public key.
    #[error("signature does not verify")]
    InvalidSignature,
}

fn fixed<const N: usize>(what: &'static str, bytes: &[u8]) -> Result<[u8; N], AntiExfilError> {
    bytes
        .try_into()
        .map_err(|_| AntiExfilError::InvalidLength {
            what,
            expected: N,
            got: bytes.len(),
        })
}

/// The host's secret randomness, revealed to the signer only after it has committed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HostEntropy([u8; 32]);

impl HostEntropy {
    /// Wraps 32 bytes of host entropy.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parses host entropy, rejecting anything but 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AntiExfilError> {
        fixed("host entropy", bytes).map(Self)
    }

    /// Raw entropy bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The commitment the host sends before revealing this entropy.
    pub fn commit(&self) -> HostCommitment {
        HostCommitment(tagged_hash(S2C_DATA_TAG, &[&self.0]))
    }
}

impl fmt::Debug for HostEntropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostEntropy(..)")
    }
}

/// Host commitment to its entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCommitment([u8; 32]);

impl HostCommitment {
    /// Parses a host commitment, rejecting anything but 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AntiExfilError> {
        fixed("host commitment", bytes).map(Self)
    }

    /// Raw commitment bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// The signer's commitment to its original nonce: the compressed point `k·G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignerCommitment([u8; 33]);

impl SignerCommitment {
    /// Parses a signer commitment, rejecting anything but 33 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AntiExfilError> {
        fixed("signer commitment", bytes).map(Self)
    }

    /// Serialized compressed point.
    pub const fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }
}

impl fmt::Display for SignerCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// The commitment a host sends for `entropy`. Same as [`HostEntropy::commit`].
pub fn host_commitment(entropy: &HostEntropy) -> HostCommitment {
    entropy.commit()
}

/// The nonce tweak `t = H_point(R0 || e)`.
fn nonce_tweak(
    signer_commitment: &SignerCommitment,
    host_entropy: &HostEntropy,
) -> Result<Scalar, AntiExfilError> {
    let hash = tagged_hash(
        S2C_POINT_TAG,
        &[signer_commitment.as_bytes(), host_entropy.as_bytes()],
    );
    scalar_from_bytes(&hash).ok_or(AntiExfilError::InvalidNonce)
}

/// Signer state after the commit phase. Consumed by [`Committed::sign`].
pub struct Committed {
    seckey: Scalar,
    digest: [u8; 32],
    nonce: Scalar,
    host_commitment: HostCommitment,
    signer_commitment: SignerCommitment,
}

/// Commit phase: derives the nonce from the host commitment and returns the signer commitment
/// inside the [`Committed`] state.
///
/// Running this twice with the same inputs yields the same [`SignerCommitment`].
pub fn commit(
    seckey: &SecretKey,
    digest: &[u8; 32],
    host_commitment: &HostCommitment,
) -> Result<Committed, AntiExfilError> {
    let secret_bytes = seckey.secret_bytes();
    let d = scalar_from_bytes(&secret_bytes).ok_or(AntiExfilError::InvalidSecretKey)?;

    let k = rfc6979::nonce(&secret_bytes, digest, Some(host_commitment.as_bytes()));
    let r0 = point_to_compressed(&(ProjectivePoint::GENERATOR * k))
        .ok_or(AntiExfilError::InvalidNonce)?;

    Ok(Committed {
        seckey: d,
        digest: *digest,
        nonce: k,
        host_commitment: *host_commitment,
        signer_commitment: SignerCommitment(r0),
    })
}

impl Committed {
    /// The commitment to hand to the host before it reveals its entropy.
    pub const fn signer_commitment(&self) -> &SignerCommitment {
        &self.signer_commitment
    }

    /// Reveal phase: tweaks the committed nonce with the host entropy and signs.
    ///
    /// The entropy must open the host commitment given to [`commit`].
    pub fn sign(self, host_entropy: &HostEntropy) -> Result<Signature, AntiExfilError> {
        if host_entropy.commit() != self.host_commitment {
            return Err(AntiExfilError::EntropyMismatch);
        }

        let tweak = nonce_tweak(&self.signer_commitment, host_entropy)?;
        let k = self.nonce + tweak;
        sign_with_nonce(&self.seckey, &self.digest, &k)
    }
}

impl fmt::Debug for Committed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Committed")
            .field("signer_commitment", &self.signer_commitment)
            .finish_non_exhaustive()
    }
}

impl Drop for Committed {
    fn drop(&mut self) {
        self.seckey = Scalar::ZERO;
        self.nonce = Scalar::ZERO;
    }
}

/// Plain ECDSA with an explicit nonce, low-S normalized.
pub(crate) fn sign_with_nonce(
    d: &Scalar,
    digest: &[u8; 32],
    k: &Scalar,
) -> Result<Signature, AntiExfilError> {
    let k_inv: Option<Scalar> = k.invert().into();
    let k_inv = k_inv.ok_or(AntiExfilError::InvalidNonce)?;

    let r = point_x_scalar(&(ProjectivePoint::GENERATOR * k));
    let z = scalar_reduce(digest);
    let s = k_inv * (z + r * d);
    if bool::from(r.is_zero()) || bool::from(s.is_zero()) {
        return Err(AntiExfilError::InvalidNonce);
    }

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&scalar_to_bytes(&r));
    compact[32..].copy_from_slice(&scalar_to_bytes(&s));
    let mut sig = Signature::from_compact(&compact).map_err(|_| AntiExfilError::InvalidNonce)?;
    sig.normalize_s();
    Ok(sig)
}

/// Host-side check that `sig` was produced with the committed nonce tweaked by `host_entropy`,
/// and that it is a valid signature by `pubkey` over `digest`.
pub fn verify(
    pubkey: &PublicKey,
    digest: &[u8; 32],
    sig: &Signature,
    host_entropy: &HostEntropy,
    signer_commitment: &SignerCommitment,
) -> Result<(), AntiExfilError> {
    let r0 = point_from_compressed(signer_commitment.as_bytes())
        .ok_or(AntiExfilError::InvalidCommitment)?;
    let tweak = nonce_tweak(signer_commitment, host_entropy)?;
    let expected_r = point_x_scalar(&(r0 + ProjectivePoint::GENERATOR * tweak));

    let compact = sig.serialize_compact();
    let mut r = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    if scalar_reduce(&r) != expected_r {
        return Err(AntiExfilError::CommitmentMismatch);
    }

    SECP256K1
        .verify_ecdsa(&Message::from_digest(*digest), sig, pubkey)
        .map_err(|_| AntiExfilError::InvalidSignature)
}
