//! Records exchanged between the software signer and the wallet session, and the trait the
//! signer implements for it.
//!
//! The wallet session owns the wire encoding (JSON); these types only mirror its field names.

pub mod device;
pub mod records;
pub mod traits;

pub use device::{DeviceDescriptor, DeviceInfo};
pub use records::{
    BlindingData, MessageSignature, MessageSigningRequest, SigningInput, TransactionDetails,
    TransactionOutput, TransactionSignatures, TransactionSigningRequest, Utxo,
};
pub use traits::Authenticator;
