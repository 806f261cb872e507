// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Client-side core of the Radix ledger: the particle and atom model, its
//! canonical DSON encoding and JSON wire form, hashing and identifiers,
//! proof of work stamping, and reducers folding observed particles into
//! application state.

pub mod address;
pub mod atom;
pub mod cli_shared;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod networks;
pub mod observation;
pub mod particles;
pub mod pow;
pub mod primitives;
pub mod reducer;
pub mod rri;
mod tool;
pub mod wire_json;

pub use config::Config;
pub use tool::main::main as radix_tool_main;
