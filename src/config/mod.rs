// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::networks::UniverseConfig;
use crate::observation::TrackerConfig;
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "RADIX_CONFIG_PATH";

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct LogConfig {
    pub filters: Vec<LogValue>,
}

impl LogConfig {
    /// Directives in [`tracing_subscriber::EnvFilter`] syntax.
    pub fn to_filter_string(&self) -> String {
        self.filters
            .iter()
            .map(|f| match &f.module {
                Some(module) => format!("{module}={}", f.level),
                None => f.level.clone(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filters: vec![
                LogValue::new(None, "info"),
                LogValue::new(Some("radix::reducer"), "warn"),
            ],
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct LogValue {
    /// Target the level applies to, every target if absent.
    pub module: Option<String>,
    pub level: String,
}

impl LogValue {
    pub fn new(module: Option<&str>, level: &str) -> Self {
        Self {
            module: module.map(str::to_string),
            level: level.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub universe: UniverseConfig,
    pub tracker: TrackerConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let toml = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_toml(&toml).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(toml: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Loads the file named by [`CONFIG_PATH_ENV`], or the defaults when it is unset.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => {
                tracing::debug!(path = %path.to_string_lossy(), "loading config");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn dump(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::networks::{Network, UniverseConfig};
    use pretty_assertions::assert_eq;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn dump_and_load() {
        let config = Config {
            universe: UniverseConfig::betanet(),
            tracker: TrackerConfig { dedup: false },
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radix.toml");
        std::fs::write(&path, config.dump().unwrap()).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_files_use_defaults() {
        let config = Config::from_toml(
            r#"
            [universe]
            network = "mainnet"
            pow_target_zeros = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.universe.network, Network::Mainnet);
        assert_eq!(config.universe.magic(), Network::Mainnet.magic());
        assert_eq!(config.universe.pow_target_zeros, 20);
        assert!(config.tracker.dedup);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn every_section_is_a_table() {
        let dumped = Config::default().dump().unwrap();
        assert_eq!(dumped.trim_start().chars().next(), Some('['));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn default_log_filters_parse() {
        EnvFilter::builder()
            .parse(LogConfig::default().to_filter_string())
            .unwrap();
    }
}
