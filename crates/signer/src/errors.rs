//! Errors returned by the signer.

use soft_signer_key_deriv::DerivationError;
use soft_signer_primitives::AntiExfilError;
use thiserror::Error;

/// Everything that can make a signing call fail.
///
/// Every error is fatal for the call that raised it; no partial results are returned.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The input's script type is not signed with a segwit sighash.
    #[error("input {index}: script type {script_type} is not supported")]
    UnsupportedInput {
        /// Index of the offending input.
        index: usize,
        /// Its script type code.
        script_type: u32,
    },

    /// A field the request needs is absent.
    #[error("malformed request: missing {0}")]
    MissingField(&'static str),

    /// A field is present but cannot be decoded.
    #[error("malformed request: invalid {field}: {reason}")]
    InvalidField {
        /// Name of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The transaction could not be decoded.
    #[error("malformed request: invalid transaction: {0}")]
    InvalidTransaction(String),

    /// A signing input has no matching transaction input.
    #[error("malformed request: signing input {index} but transaction has {inputs} inputs")]
    InputOutOfRange {
        /// Index of the signing input.
        index: usize,
        /// Number of transaction inputs.
        inputs: usize,
    },

    /// The described outputs do not line up with the transaction outputs.
    #[error("malformed request: {described} outputs described but transaction has {actual}")]
    OutputMismatch {
        /// Number of outputs described by the wallet session.
        described: usize,
        /// Number of outputs in the transaction.
        actual: usize,
    },

    /// There are no spent UTXOs to balance the outputs against.
    #[error("cannot balance blinding factors: no spent utxos")]
    EmptyEndpointSet,

    /// There is no non-fee output to absorb the balancing blinding factor.
    #[error("cannot balance blinding factors: no blinded output")]
    NoBlindedOutput,

    /// A blinding factor is not a valid scalar.
    #[error("invalid blinding factor")]
    InvalidBlindingFactor,

    /// The OS entropy source failed.
    #[error("entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    /// Key derivation failed.
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    /// The Anti-Exfil protocol failed.
    #[error("anti-exfil: {0}")]
    AntiExfil(#[from] AntiExfilError),
}

impl SignerError {
    pub(crate) fn invalid(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }
}
