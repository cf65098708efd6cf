//! The interface a wallet session drives a signer through.

use crate::{
    DeviceInfo, MessageSignature, MessageSigningRequest, TransactionSignatures,
    TransactionSigningRequest,
};

/// A signer standing in for a hardware device.
///
/// Calls are synchronous and run to completion; a failed call never returns partial results.
pub trait Authenticator {
    /// Error returned by failed calls.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Capabilities reported to the wallet session at registration.
    fn device_info(&self) -> DeviceInfo;

    /// The base58 extended public key at `path`.
    fn get_xpub(&self, path: &[u32]) -> Result<String, Self::Error>;

    /// Signs a text message.
    fn sign_message(
        &self,
        request: &MessageSigningRequest,
    ) -> Result<MessageSignature, Self::Error>;

    /// Signs every input of a transaction, blinding its outputs first on confidential networks.
    fn sign_transaction(
        &self,
        request: &TransactionSigningRequest,
    ) -> Result<TransactionSignatures, Self::Error>;
}
