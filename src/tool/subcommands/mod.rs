// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod address_cmd;
pub mod config_cmd;
pub mod inspect_cmd;
pub mod pow_cmd;

use crate::atom::Atom;
use crate::wire_json::HasWireJson as _;
use anyhow::Context as _;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Command-line options for the `radix-tool` binary
#[derive(Parser)]
#[command(name = "radix-tool", author = env!("CARGO_PKG_AUTHORS"), version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Configuration file, `RADIX_CONFIG_PATH` if omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Subcommand,
}

/// radix-tool sub-commands
#[derive(clap::Subcommand)]
pub enum Subcommand {
    /// Derive the address of a public key
    Address(address_cmd::AddressCommand),

    /// Decode a JSON atom and show its identity and size
    Inspect(inspect_cmd::InspectCommand),

    /// Stamp a JSON atom with a proof of work
    Pow(pow_cmd::PowCommand),

    /// Show the configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

fn read_atom(path: &Path) -> anyhow::Result<Atom> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Atom::from_wire_json_str(&json).with_context(|| format!("{} is not a JSON atom", path.display()))
}
