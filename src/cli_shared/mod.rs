// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod logger;

use crate::config::Config;
use std::path::PathBuf;

/// Reads the configuration from `path` if given, else as [`Config::from_env`] does.
pub fn read_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::from_env(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_config_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radix.toml");
        std::fs::write(&path, "[tracker]\ndedup = false\n").unwrap();
        let config = read_config(Some(&path)).unwrap();
        assert!(!config.tracker.dedup);
    }
}
