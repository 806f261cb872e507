// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::config::Config;
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Dump the effective configuration as TOML
    Dump,
}

impl ConfigCommands {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Dump => {
                print!("{}", config.dump()?);
                Ok(())
            }
        }
    }
}
