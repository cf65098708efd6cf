//! Decoding of request fields.

use soft_signer_primitives::{byte_order, HostCommitment, HostEntropy, SigningMode};

use crate::SignerError;

pub(crate) fn required<'a>(
    field: &'static str,
    value: Option<&'a String>,
) -> Result<&'a str, SignerError> {
    value
        .map(String::as_str)
        .ok_or(SignerError::MissingField(field))
}

pub(crate) fn hex_bytes(field: &'static str, value: &str) -> Result<Vec<u8>, SignerError> {
    hex::decode(value).map_err(|e| SignerError::invalid(field, e))
}

/// A 32-byte value given as display-order hex, in internal order.
pub(crate) fn display_order(field: &'static str, value: &str) -> Result<[u8; 32], SignerError> {
    byte_order::from_display_hex(value).map_err(|e| SignerError::invalid(field, e))
}

/// Picks the signing mode; Anti-Exfil needs both host values.
pub(crate) fn signing_mode(
    use_ae_protocol: bool,
    host_commitment: Option<&String>,
    host_entropy: Option<&String>,
) -> Result<SigningMode, SignerError> {
    if !use_ae_protocol {
        return Ok(SigningMode::Plain);
    }

    let commitment = hex_bytes(
        "ae_host_commitment",
        required("ae_host_commitment", host_commitment)?,
    )?;
    let entropy = hex_bytes(
        "ae_host_entropy",
        required("ae_host_entropy", host_entropy)?,
    )?;

    Ok(SigningMode::AntiExfil {
        host_commitment: HostCommitment::from_slice(&commitment)
            .map_err(|e| SignerError::invalid("ae_host_commitment", e))?,
        host_entropy: HostEntropy::from_slice(&entropy)
            .map_err(|e| SignerError::invalid("ae_host_entropy", e))?,
    })
}
