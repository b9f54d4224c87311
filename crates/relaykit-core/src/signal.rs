//! Signals, waves, and per-wave reports.
//!
//! A [`Wave`] is allocated for every external stimulus and shared (by
//! cheap `Arc` clone) with every [`Signal`] delivered while that stimulus
//! propagates. Besides its identity the wave carries a fault ledger and a
//! handful of counters; the stimulus owner calls [`Wave::settle`] once the
//! broadcast has returned to learn whether the circuit accepted the change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use indexmap::IndexMap;

use crate::error::CircuitError;
use crate::id::{ComponentId, WaveId};

struct WaveState {
    id: WaveId,
    started: Instant,
    transitions: AtomicU64,
    deliveries: AtomicU64,
    suppressed: AtomicU64,
    /// Outstanding faults keyed by the component that raised them.
    /// Insertion-ordered so `settle` reports the earliest fault first.
    faults: Mutex<IndexMap<ComponentId, CircuitError>>,
}

/// One transitive broadcast triggered by a single external change.
///
/// Cloning a `Wave` is cheap and yields a handle to the same wave.
#[derive(Clone)]
pub struct Wave {
    state: Arc<WaveState>,
}

// Compile-time assertion: Wave must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Wave>();
};

impl Wave {
    /// Start a new wave with a freshly allocated [`WaveId`].
    pub fn begin() -> Self {
        Self {
            state: Arc::new(WaveState {
                id: WaveId::next(),
                started: Instant::now(),
                transitions: AtomicU64::new(0),
                deliveries: AtomicU64::new(0),
                suppressed: AtomicU64::new(0),
                faults: Mutex::new(IndexMap::new()),
            }),
        }
    }

    /// The identity of this wave.
    pub fn id(&self) -> WaveId {
        self.state.id
    }

    /// Count one accepted state transition.
    pub fn record_transition(&self) {
        self.state.transitions.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one handler invocation.
    pub fn record_delivery(&self) {
        self.state.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one delivery recognised as a re-entrant echo of this wave.
    pub fn record_suppressed(&self) {
        self.state.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record that `component` currently rejects its inputs.
    ///
    /// Replaces any earlier fault from the same component.
    pub fn raise(&self, component: ComponentId, error: CircuitError) {
        self.faults().insert(component, error);
    }

    /// Withdraw a fault previously raised by `component`.
    ///
    /// Called when a later delivery in the same wave resolves the
    /// transient conflict (a logic hazard rather than a real fault).
    pub fn clear(&self, component: ComponentId) {
        self.faults().shift_remove(&component);
    }

    /// Whether any fault is outstanding.
    pub fn has_faults(&self) -> bool {
        !self.faults().is_empty()
    }

    /// Snapshot of the wave's counters.
    pub fn report(&self) -> WaveReport {
        WaveReport {
            wave: self.state.id,
            transitions: self.state.transitions.load(Ordering::Relaxed),
            deliveries: self.state.deliveries.load(Ordering::Relaxed),
            suppressed: self.state.suppressed.load(Ordering::Relaxed),
            elapsed_us: self.state.started.elapsed().as_micros() as u64,
        }
    }

    /// Conclude the wave once its broadcast has returned.
    ///
    /// Returns the earliest outstanding fault, or the wave's report if
    /// every component accepted its final inputs.
    pub fn settle(&self) -> Result<WaveReport, CircuitError> {
        if let Some((_, err)) = self.faults().first() {
            return Err(err.clone());
        }
        Ok(self.report())
    }

    fn faults(&self) -> MutexGuard<'_, IndexMap<ComponentId, CircuitError>> {
        self.state
            .faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Wave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wave").field("id", &self.state.id).finish()
    }
}

/// The unit exchanged between components: a boolean plus its wave.
///
/// Immutable once created.
#[derive(Clone, Debug)]
pub struct Signal {
    value: bool,
    wave: Wave,
}

impl Signal {
    /// Create a signal carrying `value` within `wave`.
    pub fn new(value: bool, wave: Wave) -> Self {
        Self { value, wave }
    }

    /// The boolean level carried by this signal.
    pub fn value(&self) -> bool {
        self.value
    }

    /// The wave this signal belongs to.
    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    /// Shorthand for `self.wave().id()`.
    pub fn wave_id(&self) -> WaveId {
        self.wave.id()
    }
}

/// Counters collected for a single settled wave.
///
/// Durations are in microseconds. Mutators return one of these inside
/// [`Settled::Wave`] so callers can audit what a stimulus caused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaveReport {
    /// Identity of the wave.
    pub wave: WaveId,
    /// Number of publisher state transitions accepted.
    pub transitions: u64,
    /// Number of handler invocations.
    pub deliveries: u64,
    /// Number of deliveries recognised as re-entrant echoes.
    pub suppressed: u64,
    /// Wall-clock time from wave start to report, in microseconds.
    pub elapsed_us: u64,
}

/// Outcome of a successful mutation on a source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settled {
    /// The requested level equals the current one; no wave was started.
    Unchanged,
    /// A wave was started and has fully settled.
    Wave(WaveReport),
}

impl Settled {
    /// Whether a wave actually ran.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Wave(_))
    }

    /// The wave report, if a wave ran.
    pub fn report(&self) -> Option<&WaveReport> {
        match self {
            Self::Unchanged => None,
            Self::Wave(r) => Some(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fault(label: &str) -> CircuitError {
        CircuitError::InvalidInput {
            component: ComponentId::next(),
            label: label.into(),
            wave: None,
            reason: "test".into(),
        }
    }

    #[test]
    fn fresh_wave_settles_clean() {
        let wave = Wave::begin();
        wave.record_delivery();
        wave.record_transition();
        let report = wave.settle().unwrap();
        assert_eq!(report.wave, wave.id());
        assert_eq!(report.deliveries, 1);
        assert_eq!(report.transitions, 1);
        assert_eq!(report.suppressed, 0);
    }

    #[test]
    fn cleared_fault_does_not_surface() {
        let wave = Wave::begin();
        let c = ComponentId::next();
        wave.raise(c, fault("a"));
        assert!(wave.has_faults());
        wave.clear(c);
        assert!(!wave.has_faults());
        assert!(wave.settle().is_ok());
    }

    #[test]
    fn earliest_fault_is_reported() {
        let wave = Wave::begin();
        wave.raise(ComponentId::next(), fault("first"));
        wave.raise(ComponentId::next(), fault("second"));
        match wave.settle() {
            Err(CircuitError::InvalidInput { label, .. }) => assert_eq!(label, "first"),
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn clones_share_state() {
        let wave = Wave::begin();
        let signal = Signal::new(true, wave.clone());
        signal.wave().record_delivery();
        assert_eq!(wave.report().deliveries, 1);
        assert_eq!(signal.wave_id(), wave.id());
        assert!(signal.value());
    }

    #[test]
    fn settled_accessors() {
        assert!(!Settled::Unchanged.changed());
        assert!(Settled::Unchanged.report().is_none());
        let s = Settled::Wave(WaveReport::default());
        assert!(s.changed());
        assert_eq!(s.report().unwrap().wave, WaveId::NONE);
    }

    proptest! {
        #[test]
        fn ledger_reports_earliest_outstanding_fault(
            ops in prop::collection::vec((0usize..4, any::<bool>()), 0..32),
        ) {
            let components: Vec<ComponentId> = (0..4).map(|_| ComponentId::next()).collect();
            let wave = Wave::begin();
            let mut model: Vec<usize> = Vec::new();
            for (who, raise) in ops {
                if raise {
                    wave.raise(components[who], fault(&who.to_string()));
                    if !model.contains(&who) {
                        model.push(who);
                    }
                } else {
                    wave.clear(components[who]);
                    model.retain(|&m| m != who);
                }
            }
            prop_assert_eq!(wave.has_faults(), !model.is_empty());
            match (wave.settle(), model.first()) {
                (Ok(_), None) => {}
                (Err(CircuitError::InvalidInput { label, .. }), Some(first)) => {
                    prop_assert_eq!(label, first.to_string());
                }
                (other, expected) => {
                    prop_assert!(false, "settled {:?}, expected fault from {:?}", other, expected);
                }
            }
        }
    }
}
