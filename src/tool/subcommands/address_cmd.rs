// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::address::Address;
use crate::config::Config;
use crate::crypto::PublicKey;
use anyhow::Context as _;

#[derive(Debug, clap::Args)]
pub struct AddressCommand {
    /// Compressed secp256k1 public key, hex encoded
    #[arg(long)]
    public_key: String,
}

impl AddressCommand {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let bytes = hex::decode(self.public_key.trim_start_matches("0x"))
            .context("public key is not hex")?;
        let public_key = PublicKey::from_bytes(&bytes)?;
        let address = Address::new(config.universe.magic(), public_key);
        println!("address: {address}");
        println!("euid:    {}", address.euid());
        println!("network: {}", config.universe.network);
        Ok(())
    }
}
