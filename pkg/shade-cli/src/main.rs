#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]

//! `shade`: offline tooling for notes, trees and vault configuration

mod note;
mod telemetry;
mod tree;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use shade_primitives::{parameters, Element};
use shade_vault::VaultConfig;

use crate::{note::NoteCommand, telemetry::LogFormat, tree::TreeCommand};

#[derive(Debug, Parser)]
#[command(name = "shade", about = "Offline tooling for the shade pool", version)]
struct Cli {
    /// How to render logs on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, env = "SHADE_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create and inspect notes
    #[command(subcommand)]
    Note(NoteCommand),
    /// Compute tree values
    #[command(subcommand)]
    Tree(TreeCommand),
    /// Rebuild the authentication path of a deposit from a deposit log
    Path {
        /// A JSON array of deposit events
        #[arg(long)]
        log: PathBuf,
        /// The commitment to build a path for
        #[arg(long)]
        commitment: Element,
    },
    /// Print the Poseidon parameters and their fingerprint
    Params,
    /// Load and validate a vault config
    Config {
        /// A TOML file, overridden by `SHADE_*` environment variables
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    telemetry::init(cli.log_format)?;

    match cli.command {
        Command::Note(command) => print(&note::run(command)?),
        Command::Tree(command) => print(&tree::run(command)?),
        Command::Path { log, commitment } => {
            let leaves = tree::read_log(&log)?;
            print(&tree::path(&leaves, commitment)?)
        }
        Command::Params => print(parameters()),
        Command::Config { file } => {
            let config = VaultConfig::load(file.as_deref())?;
            tracing::info!(owner = %config.owner, "config is valid");
            print(&config)
        }
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
