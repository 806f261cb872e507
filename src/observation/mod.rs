// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! The boundary between a node connection and application state.
//!
//! A transport turns what a node pushes into [`ObservationEvent`]s; a
//! [`StateTracker`] folds them into its reducers. The tracker is where
//! exactly-once delivery is enforced: nodes may repeat atoms across
//! reconnects, but each spun particle is folded at most once.

use crate::address::Address;
use crate::atom::Atom;
use crate::encoding::{Dson as _, Euid};
use crate::particles::{Spin, SpunParticle};
use crate::reducer::{
    FoldReport, ReduceError, ReducerFailure, ReducerRegistry, TokenBalanceReducer, TokenBalances,
    TokenDefinitions, TokenDefinitionsReducer,
};
use ahash::HashSet;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ObservationKind {
    /// The atom was accepted into the ledger.
    Store,
    /// A previously stored atom was removed again, e.g. after a conflict.
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomObservation {
    pub atom: Atom,
    pub kind: ObservationKind,
}

impl AtomObservation {
    pub fn store(atom: Atom) -> Self {
        Self {
            atom,
            kind: ObservationKind::Store,
        }
    }

    pub fn delete(atom: Atom) -> Self {
        Self {
            atom,
            kind: ObservationKind::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationEvent {
    Atom(AtomObservation),
    /// A single particle delta, for transports that stream particles.
    Particle {
        spun: SpunParticle,
        kind: ObservationKind,
    },
    /// The node has sent everything it knew when the subscription started.
    Head,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct TrackerConfig {
    /// Fold each spun particle at most once.
    #[default(true)]
    pub dedup: bool,
}

#[derive(Debug)]
struct TrackerState {
    registry: ReducerRegistry,
    /// Registry slot, spin and particle of every successful fold.
    applied: HashSet<(usize, Spin, Euid)>,
    synced: bool,
}

/// Reducer state for one address.
///
/// Folding and recording the particle as applied happen under a single lock,
/// so concurrent observers can never fold the same particle twice. Readers
/// get cloned snapshots.
#[derive(Debug)]
pub struct StateTracker {
    address: Address,
    dedup: bool,
    state: Mutex<TrackerState>,
}

impl StateTracker {
    /// A tracker with the token balance and token definition reducers.
    pub fn new(address: Address, config: &TrackerConfig) -> Result<Self, ReduceError> {
        let mut registry = ReducerRegistry::new();
        registry.register(TokenBalanceReducer::new(address))?;
        registry.register(TokenDefinitionsReducer)?;
        Ok(Self::with_registry(address, config, registry))
    }

    /// A tracker folding into reducers chosen by the caller.
    pub fn with_registry(address: Address, config: &TrackerConfig, registry: ReducerRegistry) -> Self {
        Self {
            address,
            dedup: config.dedup,
            state: Mutex::new(TrackerState {
                registry,
                applied: HashSet::default(),
                synced: false,
            }),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn observe(&self, event: ObservationEvent) -> FoldReport {
        match event {
            ObservationEvent::Atom(AtomObservation { atom, kind }) => {
                tracing::debug!(%kind, particles = atom.spun_particles().count(), "observed atom");
                let mut report = FoldReport::default();
                let mut state = self.state.lock();
                for spun in atom.spun_particles() {
                    report.merge(self.apply(&mut state, spun, kind));
                }
                report
            }
            ObservationEvent::Particle { spun, kind } => {
                let mut state = self.state.lock();
                self.apply(&mut state, &spun, kind)
            }
            ObservationEvent::Head => {
                tracing::debug!(address = %self.address, "caught up with node");
                self.state.lock().synced = true;
                FoldReport::default()
            }
        }
    }

    fn apply(&self, state: &mut TrackerState, spun: &SpunParticle, kind: ObservationKind) -> FoldReport {
        if !self.dedup {
            return match kind {
                ObservationKind::Store => state.registry.fold(spun),
                ObservationKind::Delete => state.registry.fold(&spun.inverted()),
            };
        }
        let (spin, euid) = match spun.particle().euid() {
            Ok(euid) => (spun.spin(), euid),
            Err(e) => {
                return FoldReport {
                    updated: vec![],
                    failures: vec![ReducerFailure {
                        reducer: "observation",
                        error: e.into(),
                    }],
                };
            }
        };
        let applied = &mut state.applied;
        match kind {
            ObservationKind::Store => {
                if (0..state.registry.len()).all(|slot| applied.contains(&(slot, spin, euid))) {
                    tracing::debug!(%spin, particle = %euid, "skipping particle already folded");
                    return FoldReport::default();
                }
                // Reducers that failed stay unmarked and retry on redelivery.
                let (report, folded) = state
                    .registry
                    .fold_selected(spun, |slot| !applied.contains(&(slot, spin, euid)));
                applied.extend(folded.into_iter().map(|slot| (slot, spin, euid)));
                report
            }
            ObservationKind::Delete => {
                let (report, folded) = state
                    .registry
                    .fold_selected(&spun.inverted(), |slot| applied.contains(&(slot, spin, euid)));
                for slot in folded {
                    applied.remove(&(slot, spin, euid));
                }
                report
            }
        }
    }

    /// Whether a [`ObservationEvent::Head`] has been seen.
    pub fn is_synced(&self) -> bool {
        self.state.lock().synced
    }

    pub fn token_balances(&self) -> TokenBalances {
        self.state().unwrap_or_default()
    }

    pub fn token_definitions(&self) -> TokenDefinitions {
        self.state().unwrap_or_default()
    }

    /// Snapshot of the state of type `S`.
    pub fn state<S: Clone + 'static>(&self) -> Option<S> {
        self.state.lock().registry.state()
    }

    /// Forgets everything folded so far, e.g. before resubscribing from scratch.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.registry.reset();
        state.applied.clear();
        state.synced = false;
    }

    /// Folds events until every sender is dropped.
    pub async fn run(self: Arc<Self>, events: flume::Receiver<ObservationEvent>) {
        while let Ok(event) = events.recv_async().await {
            let report = self.observe(event);
            if !report.is_ok() {
                tracing::warn!(
                    address = %self.address,
                    failures = report.failures.len(),
                    "observation partially folded"
                );
            }
        }
        tracing::debug!(address = %self.address, "observation stream closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{
        MutableSupplyTokenDefinition, ParticleGroup, TokenPermissions, TransferrableTokensParticle,
        UnallocatedTokensParticle, token_rri,
    };
    use crate::primitives::{Granularity, Nonce, PositiveAmount};
    use crate::rri::ResourceIdentifier;
    use crate::wire_json::snapshot_address;
    use num_bigint::BigInt;

    fn xrd() -> ResourceIdentifier {
        token_rri(snapshot_address(), "XRD").unwrap()
    }

    fn transfer(amount: u64) -> SpunParticle {
        SpunParticle::up(
            TransferrableTokensParticle::new(
                snapshot_address(),
                xrd(),
                Granularity::one(),
                PositiveAmount::from_u64(amount).unwrap(),
                Nonce::new(amount as i64),
                TokenPermissions::default(),
            )
            .unwrap(),
        )
    }

    fn atom() -> Atom {
        Atom::with_timestamp(
            vec![ParticleGroup::of([3, 5, 11].map(transfer))],
            1_551_000_000_000,
        )
    }

    fn tracker(dedup: bool) -> StateTracker {
        StateTracker::new(snapshot_address(), &TrackerConfig { dedup }).unwrap()
    }

    #[test]
    fn dedup_folds_each_particle_once() {
        let tracker = tracker(true);
        tracker.observe(ObservationEvent::Atom(AtomObservation::store(atom())));
        tracker.observe(ObservationEvent::Atom(AtomObservation::store(atom())));
        assert_eq!(tracker.token_balances().balance(&xrd()), BigInt::from(19));
    }

    #[test]
    fn without_dedup_repeats_count_twice() {
        let tracker = tracker(false);
        tracker.observe(ObservationEvent::Atom(AtomObservation::store(atom())));
        tracker.observe(ObservationEvent::Atom(AtomObservation::store(atom())));
        assert_eq!(tracker.token_balances().balance(&xrd()), BigInt::from(38));
    }

    #[test]
    fn delete_undoes_a_store() {
        let tracker = tracker(true);
        tracker.observe(ObservationEvent::Atom(AtomObservation::store(atom())));
        tracker.observe(ObservationEvent::Particle {
            spun: transfer(7),
            kind: ObservationKind::Store,
        });
        tracker.observe(ObservationEvent::Atom(AtomObservation::delete(atom())));
        assert_eq!(tracker.token_balances().balance(&xrd()), BigInt::from(7));
        // deleting again changes nothing
        tracker.observe(ObservationEvent::Atom(AtomObservation::delete(atom())));
        assert_eq!(tracker.token_balances().balance(&xrd()), BigInt::from(7));
        // and the atom can be stored again
        tracker.observe(ObservationEvent::Atom(AtomObservation::store(atom())));
        assert_eq!(tracker.token_balances().balance(&xrd()), BigInt::from(26));
    }

    #[test]
    fn consistency_errors_are_reported() {
        let tracker = tracker(true);
        let unallocated = UnallocatedTokensParticle::new(
            xrd(),
            Granularity::one(),
            PositiveAmount::from_u64(10).unwrap(),
            Nonce::new(0),
            TokenPermissions::default(),
        )
        .unwrap();
        let report = tracker.observe(ObservationEvent::Particle {
            spun: SpunParticle::up(unallocated),
            kind: ObservationKind::Store,
        });
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].reducer, "token_definitions");
        assert!(tracker.token_definitions().is_empty());
    }

    #[test]
    fn failed_folds_are_retried_on_redelivery() {
        let tracker = tracker(true);
        let unallocated = SpunParticle::up(
            UnallocatedTokensParticle::new(
                xrd(),
                Granularity::one(),
                PositiveAmount::from_u64(10).unwrap(),
                Nonce::new(0),
                TokenPermissions::default(),
            )
            .unwrap(),
        );
        let definition = SpunParticle::up(
            MutableSupplyTokenDefinition::new(
                xrd(),
                "Radix",
                "",
                Granularity::one(),
                None,
                TokenPermissions::default(),
            )
            .unwrap(),
        );
        let observe = |spun: &SpunParticle, kind| {
            tracker.observe(ObservationEvent::Particle {
                spun: spun.clone(),
                kind,
            })
        };
        let unallocated_of = || tracker.token_definitions().get(&xrd()).unwrap().unallocated.clone();

        assert!(!observe(&unallocated, ObservationKind::Store).is_ok());
        assert!(observe(&definition, ObservationKind::Store).is_ok());
        assert_eq!(unallocated_of(), BigInt::from(0));

        assert!(observe(&unallocated, ObservationKind::Store).is_ok());
        assert_eq!(unallocated_of(), BigInt::from(10));
        // now folded, a further redelivery is a duplicate
        observe(&unallocated, ObservationKind::Store);
        assert_eq!(unallocated_of(), BigInt::from(10));

        assert!(observe(&unallocated, ObservationKind::Delete).is_ok());
        assert_eq!(unallocated_of(), BigInt::from(0));
        observe(&unallocated, ObservationKind::Delete);
        assert_eq!(unallocated_of(), BigInt::from(0));
    }

    #[test]
    fn head_marks_synced_and_reset_forgets() {
        let tracker = tracker(true);
        assert!(!tracker.is_synced());
        tracker.observe(ObservationEvent::Atom(AtomObservation::store(atom())));
        tracker.observe(ObservationEvent::Head);
        assert!(tracker.is_synced());

        tracker.reset();
        assert!(!tracker.is_synced());
        assert!(tracker.token_balances().is_empty());
        tracker.observe(ObservationEvent::Atom(AtomObservation::store(atom())));
        assert_eq!(tracker.token_balances().balance(&xrd()), BigInt::from(19));
    }

    #[tokio::test]
    async fn run_drains_the_channel() {
        let tracker = Arc::new(tracker(true));
        let (tx, rx) = flume::unbounded();
        let task = tokio::spawn(tracker.clone().run(rx));
        for _ in 0..3 {
            tx.send_async(ObservationEvent::Atom(AtomObservation::store(atom())))
                .await
                .unwrap();
        }
        tx.send_async(ObservationEvent::Head).await.unwrap();
        drop(tx);
        task.await.unwrap();
        assert!(tracker.is_synced());
        assert_eq!(tracker.token_balances().balance(&xrd()), BigInt::from(19));
    }
}
