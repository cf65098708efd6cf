//! The per-input signing loop.

use soft_signer_key_deriv::{path_from_indices, KeyDeriver};
use soft_signer_primitives::{ecdsa, ScriptType};
use soft_signer_proto::{SigningInput, TransactionSigningRequest, TransactionSignatures};
use tracing::debug;

use crate::{fields::signing_mode, variant::Variant, SignerError};

/// SIGHASH_ALL, appended to every DER signature.
const SIGHASH_ALL: u8 = 0x01;

/// Rejects the request unless every input is a known segwit script type.
///
/// Runs before anything is signed so a failing request never yields a partial signature list.
fn check_segwit(inputs: &[SigningInput]) -> Result<(), SignerError> {
    for (index, input) in inputs.iter().enumerate() {
        let segwit = ScriptType::from_code(input.script_type).is_some_and(ScriptType::is_segwit);
        if !segwit {
            return Err(SignerError::UnsupportedInput {
                index,
                script_type: input.script_type,
            });
        }
    }
    Ok(())
}

/// Blinds (on confidential networks) and signs every input of the requested transaction.
///
/// Signatures and signer commitments are returned in input order.
pub fn sign_transaction<V: Variant>(
    variant: &V,
    keys: &KeyDeriver,
    request: &TransactionSigningRequest,
) -> Result<TransactionSignatures, SignerError> {
    let details = &request.transaction;
    let inputs = &request.signing_inputs;
    check_segwit(inputs)?;

    let mut tx = variant.decode(&details.transaction)?;
    let tx_inputs = V::input_count(&tx);
    if inputs.len() > tx_inputs {
        return Err(SignerError::InputOutOfRange {
            index: tx_inputs,
            inputs: tx_inputs,
        });
    }

    // sighashes must cover the final commitments
    let blinding = variant.maybe_blind(&mut tx, details)?;

    let mut signatures = Vec::with_capacity(inputs.len());
    let mut signer_commitments = Vec::new();
    for (index, input) in inputs.iter().enumerate() {
        let sighash = variant.compute_sighash(&tx, index, input)?;
        let path = path_from_indices(&input.user_path);
        debug!(%index, %path, "processing input");

        let privkey = keys.privkey(&path)?;
        let mode = signing_mode(
            request.use_ae_protocol,
            input.ae_host_commitment.as_ref(),
            input.ae_host_entropy.as_ref(),
        )?;
        let outcome = ecdsa::sign(&privkey, &sighash, &mode)?;

        if let Some(commitment) = outcome.signer_commitment {
            let commitment = commitment.to_string();
            debug!(%index, %commitment, "signer commitment");
            signer_commitments.push(commitment);
        }

        let mut der = outcome.signature.serialize_der().to_vec();
        der.push(SIGHASH_ALL);
        let signature = hex::encode(der);
        debug!(%index, %signature, "signature (der)");
        signatures.push(signature);
    }

    Ok(TransactionSignatures {
        blinding,
        signer_commitments: request.use_ae_protocol.then_some(signer_commitments),
        signatures,
    })
}
