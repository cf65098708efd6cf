//! Key derivation primitives for the software signer.
//!
//! This crate holds the wallet mnemonic and derives all key material from it: the BIP39 seed,
//! the BIP32 master key, per-path child keys and the SLIP-77 confidential blinding keys.
//!
//! # Usage
//!
//! ```rust,ignore
//! use soft_signer_key_deriv::{path_from_indices, KeyDeriver, SeedStore};
//!
//! let store = SeedStore::create(24)?;
//! let keys = KeyDeriver::new(&store)?;
//!
//! let path = path_from_indices(&[0x8000_002c, 0x8000_0001, 0x8000_0000]);
//! let xpub = keys.xpub(&path)?;
//! let privkey = keys.privkey(&path)?;
//! ```
//!
//! Child keys are never cached: every call walks the path again from the master key.

pub mod blinding;
pub mod derive;
mod paths;
pub mod seed;

pub use blinding::MasterBlindingKey;
pub use derive::{DerivationError, KeyDeriver};
pub use paths::{parse_path, path_from_indices, HARDENED};
pub use seed::{Seed, SeedStore, VALID_WORD_COUNTS};
