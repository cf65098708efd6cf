use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The signer's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Network identifier. Names containing `liquid` select the confidential signer.
    pub(crate) network: String,

    /// File holding the mnemonic phrase.
    #[serde(default = "default_mnemonic")]
    pub(crate) mnemonic: PathBuf,

    /// Word count used when a mnemonic has to be generated.
    #[serde(default = "default_words")]
    pub(crate) words: usize,
}

fn default_mnemonic() -> PathBuf {
    PathBuf::from("mnemonic.txt")
}

const fn default_words() -> usize {
    24
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: "testnet".to_owned(),
            mnemonic: default_mnemonic(),
            words: default_words(),
        }
    }
}

impl Config {
    /// Reads the TOML config at `path`, falling back to the defaults when the file is absent.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let config: Self = toml::from_str(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?;
                debug!(?config, "parsed config");
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_and_defaults() {
        let config = toml::from_str::<Config>(
            r#"
            network = "testnet-liquid"
            mnemonic = "/tmp/words.txt"
            words = 12
        "#,
        )
        .unwrap();
        assert_eq!(config.network, "testnet-liquid");
        assert_eq!(config.mnemonic, PathBuf::from("/tmp/words.txt"));
        assert_eq!(config.words, 12);

        let config = toml::from_str::<Config>(r#"network = "mainnet""#).unwrap();
        assert_eq!(config.mnemonic, default_mnemonic());
        assert_eq!(config.words, 24);

        let serialized = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<Config>(&serialized).unwrap(), config);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "network = \"liquid\"").unwrap();
        assert_eq!(Config::load(file.path()).unwrap().network, "liquid");

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Config::load(&dir.path().join("missing.toml")).unwrap(),
            Config::default()
        );

        writeln!(file, "words = \"many\"").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
