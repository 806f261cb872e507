// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::read_atom;
use crate::config::Config;
use crate::pow::PowStamper;
use crate::wire_json::HasWireJson as _;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, clap::Args)]
pub struct PowCommand {
    /// Atom in JSON wire form
    atom: PathBuf,
    /// Leading zero bits required, the universe default if omitted
    #[arg(long)]
    target_zeros: Option<u32>,
    /// Give up after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl PowCommand {
    pub async fn run(self, config: &Config) -> anyhow::Result<()> {
        let atom = read_atom(&self.atom)?;
        let stamper = PowStamper::new(
            config.universe.magic(),
            self.target_zeros.unwrap_or(config.universe.pow_target_zeros),
        )?;
        let cancel = CancellationToken::new();
        if let Some(secs) = self.timeout_secs {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(secs)).await;
                cancel.cancel();
            });
        }
        let (stamped, pow) = stamper.stamp_async(atom, cancel.clone()).await?;
        cancel.cancel();
        tracing::info!(
            nonce = pow.nonce(),
            target = pow.target_zeros(),
            zeros = pow.hash().leading_zero_bits(),
            "stamped atom"
        );
        println!("{}", stamped.into_wire_json_string_pretty()?);
        Ok(())
    }
}
