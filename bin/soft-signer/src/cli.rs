//! Parses command-line arguments for the software signer CLI.

use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(
    name = "soft-signer",
    about = "Software stand-in for a hardware wallet signer",
    version = crate_version!()
)]
pub(crate) struct Cli {
    #[clap(
        long,
        short = 'c',
        env = "SOFT_SIGNER_CONFIG",
        help = "The file containing the configuration for the signer",
        default_value = "config.toml"
    )]
    pub(crate) config: PathBuf,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Commands {
    Create(CreateArgs),

    DeviceInfo,

    Xpub(XpubArgs),

    SignMessage(RequestArgs),

    SignTx(RequestArgs),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Generate a new mnemonic and write it to the configured file")]
pub(crate) struct CreateArgs {
    #[arg(long, help = "number of words, overrides the configured value")]
    pub(crate) words: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Print the extended public key at a derivation path")]
pub(crate) struct XpubArgs {
    #[arg(
        long,
        default_value = "m",
        help = "derivation path, e.g. m/84h/1h/0h or [2147483732, 2147483649, 2147483648]"
    )]
    pub(crate) path: String,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Sign the request read from a JSON file")]
pub(crate) struct RequestArgs {
    #[arg(help = "the JSON file holding the wallet-session request")]
    pub(crate) request: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands() {
        let cli = Cli::parse_from(["soft-signer", "create", "--words", "12"]);
        assert!(matches!(
            cli.command,
            Commands::Create(CreateArgs { words: Some(12) })
        ));
        assert_eq!(cli.config, PathBuf::from("config.toml"));

        let cli = Cli::parse_from(["soft-signer", "-c", "x.toml", "xpub", "--path", "m/1h"]);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Commands::Xpub(XpubArgs { path }) if path == "m/1h"));

        let cli = Cli::parse_from(["soft-signer", "sign-tx", "req.json"]);
        assert!(matches!(cli.command, Commands::SignTx(_)));
    }
}
