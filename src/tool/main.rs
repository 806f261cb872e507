// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::ffi::OsString;

use super::subcommands::{Cli, Subcommand};
use crate::cli_shared::{logger::setup_logger, read_config};
use clap::Parser as _;

pub fn main<ArgT>(args: impl IntoIterator<Item = ArgT>) -> anyhow::Result<()>
where
    ArgT: Into<OsString> + Clone,
{
    // Capture Cli inputs
    let Cli { config, cmd } = Cli::parse_from(args);
    let config = read_config(config.as_ref())?;
    setup_logger(&config.log);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            // Run command
            match cmd {
                Subcommand::Address(cmd) => cmd.run(&config),
                Subcommand::Inspect(cmd) => cmd.run(&config),
                Subcommand::Pow(cmd) => cmd.run(&config).await,
                Subcommand::Config(cmd) => cmd.run(&config),
            }
        })
}
