//! Signing requests and responses.
//!
//! Hex strings are kept as strings here; decoding (and any byte-order conversion) is the
//! signer's job so malformed values surface as signer errors tied to the offending field.

use serde::{Deserialize, Serialize};

/// Request to sign a text message with the key at `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSigningRequest {
    /// The message, signed with the Bitcoin signed-message prefix.
    pub message: String,

    /// Derivation path as raw child numbers.
    pub path: Vec<u32>,

    /// Whether to use the Anti-Exfil protocol.
    #[serde(default)]
    pub use_ae_protocol: bool,

    /// Host commitment (hex). Required when `use_ae_protocol` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ae_host_commitment: Option<String>,

    /// Host entropy (hex). Required when `use_ae_protocol` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ae_host_entropy: Option<String>,
}

/// A DER-encoded message signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSignature {
    /// DER signature (hex), without a sighash byte.
    pub signature: String,

    /// Signer commitment (hex), present for Anti-Exfil signatures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_commitment: Option<String>,
}

/// Request to sign every input listed in `signing_inputs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSigningRequest {
    /// The transaction and the context needed to blind it.
    pub transaction: TransactionDetails,

    /// One entry per transaction input, in input order.
    pub signing_inputs: Vec<SigningInput>,

    /// Whether to use the Anti-Exfil protocol for every input.
    #[serde(default)]
    pub use_ae_protocol: bool,
}

/// The unsigned transaction plus the wallet session's view of its outputs and spent UTXOs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetails {
    /// Consensus-encoded transaction (hex).
    pub transaction: String,

    /// One entry per transaction output, in output order.
    #[serde(default)]
    pub transaction_outputs: Vec<TransactionOutput>,

    /// UTXOs spent by the transaction.
    #[serde(default)]
    pub used_utxos: Vec<Utxo>,

    /// UTXOs spent by the transaction being replaced, used when `used_utxos` is empty.
    #[serde(default)]
    pub old_used_utxos: Vec<Utxo>,
}

impl TransactionDetails {
    /// The UTXOs whose blinding factors enter the balancing equation.
    pub fn spent_utxos(&self) -> &[Utxo] {
        if self.used_utxos.is_empty() {
            &self.old_used_utxos
        } else {
            &self.used_utxos
        }
    }
}

/// A transaction output as described by the wallet session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Whether this is the (always explicit) fee output.
    #[serde(default)]
    pub is_fee: bool,

    /// Output amount.
    pub satoshi: u64,

    /// Asset id (display-order hex). Only present on confidential networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
}

/// A spent UTXO and, on confidential networks, its blinding factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// UTXO amount.
    pub satoshi: u64,

    /// Asset blinding factor (display-order hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assetblinder: Option<String>,

    /// Value blinding factor (display-order hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amountblinder: Option<String>,
}

/// Per-input signing instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningInput {
    /// Script code of the spent output (hex).
    pub prevout_script: String,

    /// Amount of the spent output.
    pub satoshi: u64,

    /// Wallet-session script type code.
    pub script_type: u32,

    /// Derivation path of the signing key as raw child numbers.
    pub user_path: Vec<u32>,

    /// Whether the spent output carries a value commitment instead of an explicit amount.
    #[serde(default)]
    pub confidential: bool,

    /// Value commitment of the spent output (hex). Required when `confidential` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment: Option<String>,

    /// Host commitment (hex) for this input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ae_host_commitment: Option<String>,

    /// Host entropy (hex) for this input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ae_host_entropy: Option<String>,
}

/// Blinding factors and commitments, one slot per transaction output. Fee slots are empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindingData {
    /// Asset blinding factors (display-order hex).
    pub assetblinders: Vec<String>,

    /// Value blinding factors (display-order hex).
    pub amountblinders: Vec<String>,

    /// Asset commitments (hex).
    pub asset_commitments: Vec<String>,

    /// Value commitments (hex).
    pub value_commitments: Vec<String>,
}

/// Result of signing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignatures {
    /// Blinding data. Only produced on confidential networks.
    #[serde(flatten)]
    pub blinding: Option<BlindingData>,

    /// Signer commitments (hex) in input order, present when Anti-Exfil was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_commitments: Option<Vec<String>>,

    /// DER signatures with a trailing sighash byte (hex), in input order.
    pub signatures: Vec<String>,
}
