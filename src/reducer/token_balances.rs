// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{ReduceError, Reducer};
use crate::address::Address;
use crate::particles::{Spin, SpunParticle};
use crate::primitives::UInt256;
use crate::rri::ResourceIdentifier;
use num_bigint::BigInt;
use num_traits::Zero as _;
use std::collections::BTreeMap;

/// Net token balances of one address.
///
/// Balances are signed so that particles can be folded in any order: a
/// consumption seen before the matching production leaves a negative balance
/// until the production arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBalances {
    balances: BTreeMap<ResourceIdentifier, BigInt>,
}

impl TokenBalances {
    pub fn get(&self, token: &ResourceIdentifier) -> Option<&BigInt> {
        self.balances.get(token)
    }

    /// The balance of `token`, zero if nothing was observed for it.
    pub fn balance(&self, token: &ResourceIdentifier) -> BigInt {
        self.get(token).cloned().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceIdentifier, &BigInt)> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    fn apply(&mut self, token: &ResourceIdentifier, delta: BigInt) {
        let balance = self.balances.entry(token.clone()).or_default();
        *balance += delta;
        if balance.is_zero() {
            self.balances.remove(token);
        }
    }
}

pub(super) fn signed(spin: Spin, amount: &UInt256) -> BigInt {
    let amount = BigInt::from(amount.as_big_uint().clone());
    match spin {
        Spin::Up => amount,
        Spin::Down => -amount,
    }
}

/// Sums transferrable tokens owned by `address`.
///
/// Up particles add their amount and down particles subtract it. Tokens
/// owned by other addresses are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalanceReducer {
    address: Address,
}

impl TokenBalanceReducer {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl Reducer for TokenBalanceReducer {
    type State = TokenBalances;

    fn name(&self) -> &'static str {
        "token_balances"
    }

    fn reduce(
        &self,
        state: &TokenBalances,
        spun: &SpunParticle,
    ) -> Result<Option<TokenBalances>, ReduceError> {
        let Some(tokens) = spun.particle().as_transferrable() else {
            return Ok(None);
        };
        if tokens.address() != &self.address {
            return Ok(None);
        }
        let mut next = state.clone();
        next.apply(
            tokens.token_definition_reference(),
            signed(spun.spin(), tokens.amount().value()),
        );
        Ok(Some(next))
    }
}
