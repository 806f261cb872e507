// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::config::LogConfig;
use std::io::IsTerminal as _;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Logs to stderr, so that stdout carries only command output.
///
/// `RUST_LOG` takes precedence over the configured filters.
pub fn setup_logger(config: &LogConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::Layer::new()
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr)
                .with_filter(get_env_filter(config_filter(config))),
        )
        .init();
}

/// Returns an [`EnvFilter`] according to the `RUST_LOG` environment variable, or `def`.
fn get_env_filter(def: EnvFilter) -> EnvFilter {
    use std::env::{
        self,
        VarError::{NotPresent, NotUnicode},
    };
    match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(s) => EnvFilter::new(s),
        Err(NotPresent) => def,
        Err(NotUnicode(_)) => EnvFilter::default(),
    }
}

fn config_filter(config: &LogConfig) -> EnvFilter {
    let directives = config.to_filter_string();
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("ignoring invalid log filters {directives:?}: {e}");
        EnvFilter::new("info")
    })
}
