//! Single entry point for producing an ECDSA signature in either signing mode.

use secp256k1::{ecdsa::Signature, Message, SecretKey, SECP256K1};

use crate::anti_exfil::{self, AntiExfilError, HostCommitment, HostEntropy, SignerCommitment};

/// How a signature is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    /// Deterministic RFC6979 ECDSA, ground to a low-R signature.
    Plain,

    /// Anti-Exfil commit/reveal signing.
    AntiExfil {
        /// Host commitment to its entropy, received first.
        host_commitment: HostCommitment,

        /// Host entropy, revealed after the signer commitment has been produced.
        host_entropy: HostEntropy,
    },
}

/// A raw `(r, s)` signature, plus the signer commitment when Anti-Exfil was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignOutcome {
    /// The signature. DER encoding and sighash bytes are the caller's business.
    pub signature: Signature,

    /// Commitment to the signer's nonce. [`None`] in [`SigningMode::Plain`].
    pub signer_commitment: Option<SignerCommitment>,
}

/// Signs `digest` with `seckey`.
pub fn sign(
    seckey: &SecretKey,
    digest: &[u8; 32],
    mode: &SigningMode,
) -> Result<SignOutcome, AntiExfilError> {
    match mode {
        SigningMode::Plain => Ok(SignOutcome {
            signature: SECP256K1.sign_ecdsa_low_r(&Message::from_digest(*digest), seckey),
            signer_commitment: None,
        }),
        SigningMode::AntiExfil {
            host_commitment,
            host_entropy,
        } => {
            let committed = anti_exfil::commit(seckey, digest, host_commitment)?;
            let signer_commitment = *committed.signer_commitment();
            let signature = committed.sign(host_entropy)?;
            Ok(SignOutcome {
                signature,
                signer_commitment: Some(signer_commitment),
            })
        }
    }
}
