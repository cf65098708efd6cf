//! Bitcoin signed-message signing.

use bitcoin::{hashes::Hash, sign_message::signed_msg_hash};
use soft_signer_key_deriv::{path_from_indices, KeyDeriver};
use soft_signer_primitives::ecdsa;
use soft_signer_proto::{MessageSignature, MessageSigningRequest};
use tracing::debug;

use crate::{fields::signing_mode, SignerError};

/// Signs `request.message` with the key at `request.path`.
///
/// The digest is the double SHA256 of the message behind the `Bitcoin Signed Message` prefix.
/// The DER signature carries no sighash byte.
pub fn sign_message(
    keys: &KeyDeriver,
    request: &MessageSigningRequest,
) -> Result<MessageSignature, SignerError> {
    let mode = signing_mode(
        request.use_ae_protocol,
        request.ae_host_commitment.as_ref(),
        request.ae_host_entropy.as_ref(),
    )?;

    let digest = signed_msg_hash(&request.message).to_byte_array();
    let path = path_from_indices(&request.path);
    let privkey = keys.privkey(&path)?;

    let outcome = ecdsa::sign(&privkey, &digest, &mode)?;
    let signer_commitment = outcome.signer_commitment.map(|c| c.to_string());
    if let Some(commitment) = &signer_commitment {
        debug!(%commitment, "signer commitment");
    }

    Ok(MessageSignature {
        signature: hex::encode(outcome.signature.serialize_der()),
        signer_commitment,
    })
}

#[cfg(test)]
mod tests {
    use secp256k1::{ecdsa::Signature, Message, SECP256K1};
    use soft_signer_key_deriv::{SeedStore, HARDENED};
    use soft_signer_primitives::{verify_anti_exfil, HostEntropy, SignerCommitment};

    use super::*;

    fn keys() -> KeyDeriver {
        let store = SeedStore::from_phrase(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon \
             abandon about",
        )
        .unwrap();
        KeyDeriver::new(&store).unwrap()
    }

    fn request(use_ae_protocol: bool, host_entropy: [u8; 32]) -> MessageSigningRequest {
        MessageSigningRequest {
            message: "greenaddress.it      login 1234".to_owned(),
            path: vec![HARDENED | 0x4741, 1],
            use_ae_protocol,
            ae_host_commitment: Some(hex::encode(
                HostEntropy::new(host_entropy).commit().as_bytes(),
            )),
            ae_host_entropy: Some(hex::encode(host_entropy)),
        }
    }

    #[test]
    fn plain_message_signature_verifies() {
        let keys = keys();
        let request = request(false, [3u8; 32]);
        let result = sign_message(&keys, &request).unwrap();
        assert!(result.signer_commitment.is_none());

        let sig = Signature::from_der(&hex::decode(&result.signature).unwrap()).unwrap();
        let digest = signed_msg_hash(&request.message).to_byte_array();
        let pk = keys.pubkey(&path_from_indices(&request.path)).unwrap();
        SECP256K1
            .verify_ecdsa(&Message::from_digest(digest), &sig, &pk)
            .unwrap();
    }

    #[test]
    fn anti_exfil_message_signature_opens_commitment() {
        let keys = keys();
        let entropy = [4u8; 32];
        let request = request(true, entropy);
        let result = sign_message(&keys, &request).unwrap();

        let commitment = hex::decode(result.signer_commitment.as_deref().unwrap()).unwrap();
        let sig = Signature::from_der(&hex::decode(&result.signature).unwrap()).unwrap();
        verify_anti_exfil(
            &keys.pubkey(&path_from_indices(&request.path)).unwrap(),
            &signed_msg_hash(&request.message).to_byte_array(),
            &sig,
            &HostEntropy::new(entropy),
            &SignerCommitment::from_slice(&commitment).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn anti_exfil_without_host_values_fails() {
        let mut request = request(true, [5u8; 32]);
        request.ae_host_commitment = None;
        assert!(matches!(
            sign_message(&keys(), &request),
            Err(SignerError::MissingField("ae_host_commitment"))
        ));
    }
}
