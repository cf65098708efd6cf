//! The software signer: stands in for a hardware wallet in front of a wallet session.
//!
//! Keys come from [`soft_signer_key_deriv`], signatures from [`soft_signer_primitives`]. This
//! crate adds the network-specific parts: sighash computation, output blinding on confidential
//! networks, and the [`Authenticator`](soft_signer_proto::Authenticator) implementation.
//!
//! Every call is synchronous and runs to completion before returning.

pub mod authenticator;
pub mod blinding;
pub mod errors;
mod fields;
pub mod message;
pub mod tx;
pub mod variant;

pub use authenticator::{is_confidential_network, Signer, SoftwareSigner};
pub use blinding::ConfidentialBlinder;
pub use errors::SignerError;
pub use variant::{Bitcoin, Elements, Variant};
