//! The two network variants a signer can run as.
//!
//! [`Bitcoin`] signs plain segwit transactions. [`Elements`] signs confidential transactions,
//! blinding their outputs before any sighash is computed. Both are driven by the same signing
//! loop through [`Variant`].

use std::fmt;

use bitcoin::{
    consensus, hashes::Hash, sighash::SighashCache, Amount, EcdsaSighashType, Script,
};
use elements::{
    confidential,
    secp256k1_zkp::{All, Secp256k1},
};
use soft_signer_key_deriv::{MasterBlindingKey, Seed};
use soft_signer_proto::{BlindingData, SigningInput, TransactionDetails};

use crate::{
    blinding::ConfidentialBlinder,
    fields::{hex_bytes, required},
    SignerError,
};

/// Network-specific behaviour of the signing loop.
pub trait Variant {
    /// The transaction type of the network.
    type Transaction;

    /// Whether this variant signs confidential transactions.
    const CONFIDENTIAL: bool;

    /// Decodes a hex-encoded transaction.
    fn decode(&self, tx_hex: &str) -> Result<Self::Transaction, SignerError>;

    /// Number of inputs of `tx`.
    fn input_count(tx: &Self::Transaction) -> usize;

    /// Blinds the outputs of `tx` in place, if the network requires it.
    fn maybe_blind(
        &self,
        tx: &mut Self::Transaction,
        details: &TransactionDetails,
    ) -> Result<Option<BlindingData>, SignerError>;

    /// The SIGHASH_ALL segwit v0 signature hash of input `index`.
    fn compute_sighash(
        &self,
        tx: &Self::Transaction,
        index: usize,
        input: &SigningInput,
    ) -> Result<[u8; 32], SignerError>;
}

fn tx_bytes(tx_hex: &str) -> Result<Vec<u8>, SignerError> {
    hex::decode(tx_hex).map_err(|e| SignerError::InvalidTransaction(e.to_string()))
}

fn check_index(index: usize, inputs: usize) -> Result<(), SignerError> {
    if index >= inputs {
        return Err(SignerError::InputOutOfRange { index, inputs });
    }
    Ok(())
}

/// Plain Bitcoin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bitcoin;

impl Variant for Bitcoin {
    type Transaction = bitcoin::Transaction;

    const CONFIDENTIAL: bool = false;

    fn decode(&self, tx_hex: &str) -> Result<Self::Transaction, SignerError> {
        consensus::deserialize(&tx_bytes(tx_hex)?)
            .map_err(|e| SignerError::InvalidTransaction(e.to_string()))
    }

    fn input_count(tx: &Self::Transaction) -> usize {
        tx.input.len()
    }

    fn maybe_blind(
        &self,
        _tx: &mut Self::Transaction,
        _details: &TransactionDetails,
    ) -> Result<Option<BlindingData>, SignerError> {
        Ok(None)
    }

    fn compute_sighash(
        &self,
        tx: &Self::Transaction,
        index: usize,
        input: &SigningInput,
    ) -> Result<[u8; 32], SignerError> {
        check_index(index, tx.input.len())?;
        let script_code = hex_bytes("prevout_script", &input.prevout_script)?;

        let sighash = SighashCache::new(tx)
            .p2wsh_signature_hash(
                index,
                Script::from_bytes(&script_code),
                Amount::from_sat(input.satoshi),
                EcdsaSighashType::All,
            )
            .map_err(|e| SignerError::invalid("transaction", e))?;
        Ok(sighash.to_byte_array())
    }
}

/// Elements confidential transactions.
pub struct Elements {
    secp: Secp256k1<All>,
    master_blinding_key: MasterBlindingKey,
}

impl Elements {
    /// Creates the confidential variant for the wallet with `seed`.
    pub fn new(seed: &Seed) -> Self {
        Self {
            secp: Secp256k1::new(),
            master_blinding_key: MasterBlindingKey::from_seed(seed),
        }
    }

    /// The SLIP-77 master blinding key of the wallet.
    pub const fn master_blinding_key(&self) -> &MasterBlindingKey {
        &self.master_blinding_key
    }

    /// The value an input's sighash commits to: its value commitment when the spent output is
    /// confidential, its explicit amount otherwise.
    fn spent_value(input: &SigningInput) -> Result<confidential::Value, SignerError> {
        if !input.confidential {
            return Ok(confidential::Value::Explicit(input.satoshi));
        }

        let commitment = hex_bytes("commitment", required("commitment", input.commitment.as_ref())?)?;
        confidential::Value::from_commitment(&commitment)
            .map_err(|e| SignerError::invalid("commitment", e))
    }
}

impl fmt::Debug for Elements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Elements").finish_non_exhaustive()
    }
}

impl Variant for Elements {
    type Transaction = elements::Transaction;

    const CONFIDENTIAL: bool = true;

    fn decode(&self, tx_hex: &str) -> Result<Self::Transaction, SignerError> {
        elements::encode::deserialize(&tx_bytes(tx_hex)?)
            .map_err(|e| SignerError::InvalidTransaction(e.to_string()))
    }

    fn input_count(tx: &Self::Transaction) -> usize {
        tx.input.len()
    }

    fn maybe_blind(
        &self,
        tx: &mut Self::Transaction,
        details: &TransactionDetails,
    ) -> Result<Option<BlindingData>, SignerError> {
        ConfidentialBlinder::new(&self.secp)
            .blind(tx, details)
            .map(Some)
    }

    fn compute_sighash(
        &self,
        tx: &Self::Transaction,
        index: usize,
        input: &SigningInput,
    ) -> Result<[u8; 32], SignerError> {
        check_index(index, tx.input.len())?;
        let script_code = elements::Script::from(hex_bytes("prevout_script", &input.prevout_script)?);
        let value = Self::spent_value(input)?;

        let sighash = elements::sighash::SighashCache::new(tx).segwitv0_sighash(
            index,
            &script_code,
            value,
            elements::EcdsaSighashType::All,
        );
        Ok(sighash.to_byte_array())
    }
}
