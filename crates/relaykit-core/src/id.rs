//! Strongly-typed identifiers allocated from process-wide counters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ComponentId`] allocation.
static COMPONENT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Counter for unique [`WaveId`] allocation.
static WAVE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Counter for unique [`SubscriptionId`] allocation.
static SUBSCRIPTION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a stateful wire component.
///
/// Every publisher and every guard core gets one at construction. Two
/// distinct components always have different IDs, even if they carry
/// the same label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocate a fresh, unique component ID. Thread-safe.
    pub fn next() -> Self {
        Self(COMPONENT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Identity of one propagation wave.
///
/// Allocated once per external stimulus (a switch flip, an oscillator
/// tick, a hot-wire registration) and threaded through every delivery
/// that stimulus causes. Monotonic, so a later wave always compares
/// greater than an earlier one. The default is [`WaveId::NONE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveId(u64);

impl WaveId {
    /// Sentinel for "no wave has been accepted yet".
    pub const NONE: WaveId = WaveId(0);

    /// Allocate a fresh, unique wave ID. Thread-safe.
    pub fn next() -> Self {
        Self(WAVE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Rebuild an ID from its raw value (as stored in an atomic slot).
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Handle for a single publisher -> handler edge.
///
/// Returned by `Publisher::subscribe` and accepted by
/// `Publisher::unsubscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocate a fresh, unique subscription ID. Thread-safe.
    pub fn next() -> Self {
        Self(SUBSCRIPTION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}
