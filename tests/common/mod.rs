// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use radix::address::Address;
use radix::atom::Atom;
use radix::crypto::PublicKey;
use radix::networks::Magic;
use radix::particles::{ParticleGroup, RriParticle, SpunParticle, token_rri};
use radix::primitives::Nonce;
use radix::wire_json::HasWireJson as _;
use tempfile::TempDir;

pub fn tool() -> Command {
    let mut cmd = cargo_bin_cmd!("radix-tool");
    cmd.env_remove("RADIX_CONFIG_PATH").env_remove("RUST_LOG");
    cmd
}

/// Magic `2` and public key `0x02` x 33.
pub fn test_address() -> Address {
    Address::new(Magic::new(2), PublicKey::from_bytes(&[0x02; 33]).unwrap())
}

pub fn test_atom(groups: i64) -> Atom {
    let rri = token_rri(test_address(), "XRD").unwrap();
    let groups = (0..groups)
        .map(|n| ParticleGroup::of([SpunParticle::up(RriParticle::new(rri.clone(), Nonce::new(n)))]))
        .collect();
    Atom::with_timestamp(groups, 1_551_000_000_000)
}

/// Writes `contents` to `name` in a fresh temporary directory.
pub fn write_tmp(name: &str, contents: &str) -> (PathBuf, TempDir) {
    let temp_dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).expect("couldn't write temp file");
    (path, temp_dir)
}

pub fn write_atom(atom: &Atom) -> (PathBuf, TempDir) {
    write_tmp("atom.json", &atom.into_wire_json_string().unwrap())
}
