//! Crate includes reusable utils for the signer binaries that handle common behavior.
//! Such as initializing the tracing framework.

pub mod logging;
