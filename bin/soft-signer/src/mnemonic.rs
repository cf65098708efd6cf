//! On-disk storage of the wallet mnemonic.

use std::{fs, io, path::Path};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use soft_signer_key_deriv::SeedStore;
use tracing::info;

/// Loads the mnemonic at `path`, generating and writing a `words`-word one if there is none.
pub(crate) fn load_or_create(path: &Path, words: usize) -> Result<SeedStore> {
    match fs::read_to_string(path) {
        Ok(phrase) => {
            let store = SeedStore::from_phrase(&phrase)
                .with_context(|| format!("invalid mnemonic in {}", path.display()))?;
            info!(
                "Loaded {}-word mnemonic from {}",
                store.word_count(),
                path.display().to_string().bold()
            );
            Ok(store)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => create(path, words),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Generates a `words`-word mnemonic and writes it to `path`, which must not exist yet.
pub(crate) fn create(path: &Path, words: usize) -> Result<SeedStore> {
    if path.exists() {
        bail!("refusing to overwrite existing mnemonic at {}", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let store = SeedStore::create(words)?;
    fs::write(path, format!("{}\n", store.mnemonic()))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        "Generated new {}-word mnemonic at {}",
        words,
        path.display().to_string().bold()
    );
    Ok(store)
}
