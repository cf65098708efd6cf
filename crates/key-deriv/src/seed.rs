//! Mnemonic storage and seed derivation.

use std::fmt;

use bip39::{Language, Mnemonic};
use bitcoin::{bip32::Xpriv, NetworkKind};
use rand::{rngs::OsRng, RngCore};
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::DerivationError;

/// Word counts that map onto a whole number of entropy bytes.
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// The 512-bit BIP39 seed.
///
/// Never serialized; wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 64]);

impl Seed {
    /// Raw seed bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Holds the wallet mnemonic for the lifetime of the process.
///
/// The mnemonic is immutable once created; the seed and master key are recomputed from it on
/// every request.
pub struct SeedStore {
    mnemonic: Mnemonic,
}

impl SeedStore {
    /// Generates a fresh mnemonic of `word_count` words from the OS entropy source.
    ///
    /// # Panics
    ///
    /// Panics if the encoded mnemonic does not have exactly `word_count` words. This cannot happen
    /// for any of the [`VALID_WORD_COUNTS`].
    pub fn create(word_count: usize) -> Result<Self, DerivationError> {
        if !VALID_WORD_COUNTS.contains(&word_count) {
            return Err(DerivationError::InvalidWordCount(word_count));
        }

        let mut entropy = Zeroizing::new(vec![0u8; word_count * 4 / 3]);
        OsRng.try_fill_bytes(&mut entropy)?;

        let mnemonic = Mnemonic::from_entropy(&entropy)?;
        assert_eq!(
            mnemonic.word_count(),
            word_count,
            "entropy length must encode to the requested word count"
        );

        info!(%word_count, "generated new mnemonic");
        Ok(Self { mnemonic })
    }

    /// Imports an existing English mnemonic phrase.
    pub fn from_phrase(phrase: &str) -> Result<Self, DerivationError> {
        let mnemonic = Mnemonic::parse_in(Language::English, phrase.trim())?;
        Ok(Self { mnemonic })
    }

    /// The stored mnemonic.
    pub const fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    /// Number of words in the stored mnemonic.
    pub fn word_count(&self) -> usize {
        self.mnemonic.word_count()
    }

    /// Derives the BIP39 seed (empty passphrase).
    pub fn seed(&self) -> Seed {
        Seed(self.mnemonic.to_seed(""))
    }

    /// Derives the test-network versioned BIP32 master private key.
    pub fn master_key(&self) -> Result<Xpriv, DerivationError> {
        Ok(Xpriv::new_master(NetworkKind::Test, self.seed().as_bytes())?)
    }
}

impl fmt::Debug for SeedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedStore")
            .field("words", &self.mnemonic.word_count())
            .finish_non_exhaustive()
    }
}

impl Drop for SeedStore {
    fn drop(&mut self) {
        self.mnemonic.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon \
                           abandon abandon abandon about";

    #[test]
    fn create_24_words_from_wordlist() {
        let store = SeedStore::create(24).unwrap();
        assert_eq!(store.word_count(), 24);

        let wordlist = Language::English.word_list();
        let words: Vec<&str> = store.mnemonic().words().collect();
        assert_eq!(words.len(), 24);
        assert!(words.iter().all(|w| wordlist.contains(w)));
    }

    #[test]
    fn create_every_valid_length() {
        for count in VALID_WORD_COUNTS {
            assert_eq!(SeedStore::create(count).unwrap().word_count(), count);
        }
    }

    #[test]
    fn create_rejects_bad_word_count() {
        for count in [0, 11, 13, 25] {
            assert!(matches!(
                SeedStore::create(count),
                Err(DerivationError::InvalidWordCount(c)) if c == count
            ));
        }
    }

    #[test]
    fn two_mnemonics_differ() {
        let a = SeedStore::create(12).unwrap();
        let b = SeedStore::create(12).unwrap();
        assert_ne!(a.mnemonic().to_string(), b.mnemonic().to_string());
    }

    #[test]
    fn known_seed_vector() {
        let store = SeedStore::from_phrase(ABANDON).unwrap();
        let expected = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
                        9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4";
        let seed = store.seed();
        let hex: String = seed.as_bytes().iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(hex, expected);
    }

    #[test]
    fn seed_and_master_key_are_deterministic() {
        let store = SeedStore::create(24).unwrap();
        assert_eq!(store.seed(), store.seed());

        let a = store.master_key().unwrap();
        let b = store.master_key().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.network, NetworkKind::Test);
        assert_eq!(a.depth, 0);
    }

    #[test]
    fn from_phrase_rejects_unknown_word() {
        let phrase = ABANDON.replace("about", "aboot");
        assert!(matches!(
            SeedStore::from_phrase(&phrase),
            Err(DerivationError::Bip39(_))
        ));
    }

    #[test]
    fn debug_does_not_leak_words() {
        let store = SeedStore::from_phrase(ABANDON).unwrap();
        let dbg = format!("{store:?} {:?}", store.seed());
        assert!(!dbg.contains("abandon"));
        assert!(!dbg.contains("5eb00b"));
    }
}
