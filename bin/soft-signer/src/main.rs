//! Runs the software signer from the command line.
//!
//! Requests and results are the wallet session's JSON records; results go to stdout.

mod cli;
mod config;
mod mnemonic;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::{de::DeserializeOwned, Serialize};
use soft_signer::SoftwareSigner;
use soft_signer_common::logging::{self, LoggerConfig};
use soft_signer_key_deriv::parse_path;
use soft_signer_proto::{Authenticator, DeviceDescriptor};
use tracing::info;

use crate::{
    cli::{Cli, Commands},
    config::Config,
};

fn main() -> Result<()> {
    let logger = LoggerConfig::with_base_name("soft-signer");
    logging::init(logger.clone());
    let _root = logging::root_span(&logger).entered();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    info!("Network: {}", config.network.bold());

    let store = match &cli.command {
        Commands::Create(args) => {
            mnemonic::create(&config.mnemonic, args.words.unwrap_or(config.words))?
        }
        _ => mnemonic::load_or_create(&config.mnemonic, config.words)?,
    };
    let signer = SoftwareSigner::new(&config.network, store)?;

    match cli.command {
        Commands::Create(_) => print_json(&serde_json::json!({
            "mnemonic_file": config.mnemonic,
            "words": signer.seed_store().word_count(),
            "xpub": signer.get_xpub(&[])?,
        })),
        Commands::DeviceInfo => print_json(&DeviceDescriptor::from(signer.device_info())),
        Commands::Xpub(args) => {
            let path = parse_path(&args.path)?;
            let indices: Vec<u32> = (&path).into_iter().map(|c| u32::from(*c)).collect();
            print_json(&serde_json::json!({ "xpub": signer.get_xpub(&indices)? }))
        }
        Commands::SignMessage(args) => {
            let request = read_json(&args.request)?;
            print_json(&signer.sign_message(&request)?)
        }
        Commands::SignTx(args) => {
            let request = read_json(&args.request)?;
            print_json(&signer.sign_transaction(&request)?)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("malformed request in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
