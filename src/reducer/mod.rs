// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Application state derived by folding observed particles.
//!
//! A [`Reducer`] is a pure function from a state and one spun particle to a
//! new state. Reducers do not deduplicate: delivering a particle twice folds
//! it twice. Exactly-once delivery is the job of
//! [`StateTracker`](crate::observation::StateTracker).

mod token_balances;
mod token_definitions;

pub use self::token_balances::{TokenBalanceReducer, TokenBalances};
pub use self::token_definitions::{
    TokenDefinition, TokenDefinitions, TokenDefinitionsReducer, TokenSupply,
};

use crate::encoding::EncodeError;
use crate::error::{self, Categorized, ErrorKind, InternalError};
use crate::particles::SpunParticle;
use crate::rri::ResourceIdentifier;
use ahash::HashMap;
use std::any::{Any, TypeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReduceError {
    /// A particle refers to a token whose definition was never observed.
    #[error("No definition observed for token {0}")]
    UnknownTokenDefinition(ResourceIdentifier),
    #[error("A reducer for state {0} is already registered")]
    AlreadyRegistered(&'static str),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Categorized for ReduceError {
    fn kind(&self) -> ErrorKind {
        match self {
            ReduceError::UnknownTokenDefinition(_) => ErrorKind::Consistency,
            ReduceError::AlreadyRegistered(_)
            | ReduceError::Encode(_)
            | ReduceError::Internal(_) => ErrorKind::Internal,
        }
    }
}

pub trait Reducer: Send + Sync + 'static {
    /// State owned by this reducer. The default value is the empty state.
    type State: Clone + Default + Send + Sync + 'static;

    /// Name used in logs and fold reports.
    fn name(&self) -> &'static str;

    fn initial_state(&self) -> Self::State {
        Self::State::default()
    }

    /// Returns the state after `spun`, or `None` if the particle does not
    /// concern this reducer.
    fn reduce(
        &self,
        state: &Self::State,
        spun: &SpunParticle,
    ) -> Result<Option<Self::State>, ReduceError>;
}

type AnyState = Box<dyn Any + Send + Sync>;

/// Object safe view of a [`Reducer`], working on type-erased state.
trait ErasedReducer: Send + Sync {
    fn name(&self) -> &'static str;
    fn initial_state(&self) -> AnyState;
    fn reduce(&self, state: &AnyState, spun: &SpunParticle) -> Result<Option<AnyState>, ReduceError>;
}

impl<R: Reducer> ErasedReducer for R {
    fn name(&self) -> &'static str {
        Reducer::name(self)
    }

    fn initial_state(&self) -> AnyState {
        Box::new(Reducer::initial_state(self))
    }

    fn reduce(&self, state: &AnyState, spun: &SpunParticle) -> Result<Option<AnyState>, ReduceError> {
        let state = state.downcast_ref::<R::State>().ok_or_else(|| {
            error::internal(
                "reduce",
                format!(
                    "{} holds a state that is not {}",
                    Reducer::name(self),
                    std::any::type_name::<R::State>()
                ),
            )
        })?;
        Ok(Reducer::reduce(self, state, spun)?.map(|next| Box::new(next) as AnyState))
    }
}

struct Slot {
    reducer: Box<dyn ErasedReducer>,
    state: AnyState,
}

/// One failed reducer in a [`FoldReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducerFailure {
    pub reducer: &'static str,
    pub error: ReduceError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldReport {
    /// Reducers whose state changed.
    pub updated: Vec<&'static str>,
    pub failures: Vec<ReducerFailure>,
}

impl FoldReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn merge(&mut self, other: FoldReport) {
        self.updated.extend(other.updated);
        self.failures.extend(other.failures);
    }
}

/// Reducers keyed by the type of their state, which is also how their state
/// is read back.
#[derive(Default)]
pub struct ReducerRegistry {
    slots: Vec<Slot>,
    by_state: HashMap<TypeId, usize>,
}

impl ReducerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reducer, starting from its initial state. Only one reducer per
    /// state type can be registered.
    pub fn register<R: Reducer>(&mut self, reducer: R) -> Result<(), ReduceError> {
        let type_id = TypeId::of::<R::State>();
        if self.by_state.contains_key(&type_id) {
            return Err(ReduceError::AlreadyRegistered(std::any::type_name::<R::State>()));
        }
        self.by_state.insert(type_id, self.slots.len());
        let state = ErasedReducer::initial_state(&reducer);
        self.slots.push(Slot {
            reducer: Box::new(reducer),
            state,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// A snapshot of the state of type `S`, if a reducer for it is registered.
    pub fn state<S: Clone + 'static>(&self) -> Option<S> {
        let slot = &self.slots[*self.by_state.get(&TypeId::of::<S>())?];
        slot.state.downcast_ref::<S>().cloned()
    }

    /// Applies `spun` to every reducer in registration order. A failing
    /// reducer keeps its previous state; the others still advance.
    pub fn fold(&mut self, spun: &SpunParticle) -> FoldReport {
        self.fold_selected(spun, |_| true).0
    }

    /// Like [`Self::fold`], limited to the slots `select` accepts. Also returns
    /// the slots that took the particle without error.
    pub(crate) fn fold_selected(
        &mut self,
        spun: &SpunParticle,
        mut select: impl FnMut(usize) -> bool,
    ) -> (FoldReport, Vec<usize>) {
        let mut report = FoldReport::default();
        let mut folded = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !select(index) {
                continue;
            }
            let name = slot.reducer.name();
            match slot.reducer.reduce(&slot.state, spun) {
                Ok(Some(next)) => {
                    slot.state = next;
                    report.updated.push(name);
                    folded.push(index);
                }
                Ok(None) => folded.push(index),
                Err(error) => {
                    tracing::warn!(reducer = name, %error, "particle not folded");
                    report.failures.push(ReducerFailure {
                        reducer: name,
                        error,
                    });
                }
            }
        }
        tracing::debug!(
            spin = %spun.spin(),
            particle = spun.particle().serializer_name(),
            updated = report.updated.len(),
            "folded particle"
        );
        (report, folded)
    }

    /// Puts every reducer back to its initial state.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.state = slot.reducer.initial_state();
        }
    }
}

impl std::fmt::Debug for ReducerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| slot.reducer.name()))
            .finish()
    }
}
