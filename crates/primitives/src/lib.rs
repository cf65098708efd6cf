//! This crate contains the signing primitives shared across the signer crates: the Anti-Exfil
//! ECDSA protocol, plain low-R ECDSA, wallet-session script types and the byte-order conversion
//! between display-order hex and internal byte arrays.
//!
//! This crate lies at the bottom of the crate-hierarchy in this workspace i.e., it does not depend
//! on any other crate in this workspace.

pub mod anti_exfil;
pub mod byte_order;
pub mod ecdsa;
mod rfc6979;
pub mod script_type;
mod secp;

pub use anti_exfil::{
    host_commitment, verify as verify_anti_exfil, AntiExfilError, HostCommitment, HostEntropy,
    SignerCommitment,
};
pub use ecdsa::{sign, SignOutcome, SigningMode};
pub use script_type::{ScriptType, UnknownScriptType};
