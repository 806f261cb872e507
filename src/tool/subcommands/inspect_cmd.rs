// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::read_atom;
use crate::config::Config;
use crate::encoding::{Dson as _, Output};
use crate::wire_json::hex_dump;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub struct InspectCommand {
    /// Atom in JSON wire form
    atom: PathBuf,
}

impl InspectCommand {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let atom = read_atom(&self.atom)?;
        let dson = atom.to_dson(Output::Hash)?;
        println!("dson:       {}", hex_dump(&dson));
        println!("hash:       {}", atom.hash()?);
        println!("hid:        {}", atom.hid()?);
        println!("particles:  {}", atom.spun_particles().count());
        println!("signatures: {}", atom.signatures().len());
        if let Some(nonce) = atom.pow_nonce() {
            println!("pow nonce:  {nonce}");
        }
        let size = atom.check_size(config.universe.max_atom_size)?;
        println!("wire size:  {size} bytes");
        Ok(())
    }
}
