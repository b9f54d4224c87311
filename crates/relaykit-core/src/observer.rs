//! Injectable observation of wire activity.
//!
//! Components report what they do through an [`Observer`] held by the
//! construction context rather than through process-wide state. The
//! default is [`NoopObserver`]; [`TracingObserver`] forwards every event
//! to the `tracing` ecosystem. Each [`WireEvent`] also exposes a
//! [`category`](WireEvent::category) and a `Display` message so an
//! external category/message audit sink can persist it verbatim.

use std::fmt;

use crate::error::CircuitError;
use crate::id::{ComponentId, SubscriptionId, WaveId};

/// A single observable occurrence on the wire.
#[derive(Clone, Copy, Debug)]
pub enum WireEvent<'a> {
    /// A publisher accepted a new level and is broadcasting it.
    Transition {
        /// The publisher.
        component: ComponentId,
        /// Its label.
        label: &'a str,
        /// The newly accepted level.
        value: bool,
        /// The wave that caused the change.
        wave: WaveId,
    },
    /// A delivery re-derived the level the publisher already accepted
    /// within the same wave (a feedback echo) and was dropped.
    Suppressed {
        /// The publisher.
        component: ComponentId,
        /// Its label.
        label: &'a str,
        /// The unchanged level.
        value: bool,
        /// The echoing wave.
        wave: WaveId,
    },
    /// A handler was attached to a publisher.
    Subscribed {
        /// The publisher.
        component: ComponentId,
        /// Its label.
        label: &'a str,
        /// The new edge.
        subscription: SubscriptionId,
    },
    /// A component rejected the inputs a wave presented to it.
    Fault {
        /// The rejecting component.
        component: ComponentId,
        /// Its label.
        label: &'a str,
        /// The offending wave.
        wave: WaveId,
        /// The rejection.
        error: &'a CircuitError,
    },
    /// A source restored its previous level after its wave faulted.
    Rollback {
        /// The source.
        component: ComponentId,
        /// Its label.
        label: &'a str,
        /// The wave that was rejected.
        wave: WaveId,
        /// The level restored.
        restored: bool,
    },
}

impl WireEvent<'_> {
    /// Short category name for audit sinks.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transition { .. } => "transition",
            Self::Suppressed { .. } => "suppressed",
            Self::Subscribed { .. } => "subscribe",
            Self::Fault { .. } => "fault",
            Self::Rollback { .. } => "rollback",
        }
    }

    /// The component the event concerns.
    pub fn component(&self) -> ComponentId {
        match *self {
            Self::Transition { component, .. }
            | Self::Suppressed { component, .. }
            | Self::Subscribed { component, .. }
            | Self::Fault { component, .. }
            | Self::Rollback { component, .. } => component,
        }
    }
}

fn level(v: bool) -> u8 {
    u8::from(v)
}

impl fmt::Display for WireEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition {
                component,
                label,
                value,
                wave,
            } => write!(f, "{label} ({component}) -> {} in {wave}", level(*value)),
            Self::Suppressed {
                component,
                label,
                value,
                wave,
            } => write!(
                f,
                "{label} ({component}) echo of {} in {wave} suppressed",
                level(*value)
            ),
            Self::Subscribed {
                component,
                label,
                subscription,
            } => write!(f, "{label} ({component}) gained subscriber {subscription}"),
            Self::Fault {
                component,
                label,
                wave,
                error,
            } => write!(f, "{label} ({component}) rejected {wave}: {error}"),
            Self::Rollback {
                component,
                label,
                wave,
                restored,
            } => write!(
                f,
                "{label} ({component}) rolled back {wave}, restored {}",
                level(*restored)
            ),
        }
    }
}

/// Receives every [`WireEvent`] produced by components built on a board.
///
/// Implementations must be cheap and must not drive any publisher: they
/// are invoked from inside a broadcast, possibly from several worker
/// threads at once.
pub trait Observer: Send + Sync {
    /// Called synchronously for each event.
    fn observe(&self, event: &WireEvent<'_>);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn observe(&self, _event: &WireEvent<'_>) {}
}

/// Forwards events to `tracing` under the `relaykit::wire` target.
///
/// Transitions are logged at `DEBUG`, suppressed echoes and new
/// subscriptions at `TRACE`, faults and rollbacks at `WARN`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn observe(&self, event: &WireEvent<'_>) {
        match *event {
            WireEvent::Transition {
                component,
                label,
                value,
                wave,
            } => tracing::debug!(
                target: "relaykit::wire",
                %component, label, value, %wave,
                "transition"
            ),
            WireEvent::Suppressed {
                component,
                label,
                value,
                wave,
            } => tracing::trace!(
                target: "relaykit::wire",
                %component, label, value, %wave,
                "re-entrant delivery suppressed"
            ),
            WireEvent::Subscribed {
                component,
                label,
                subscription,
            } => tracing::trace!(
                target: "relaykit::wire",
                %component, label, %subscription,
                "subscribed"
            ),
            WireEvent::Fault {
                component,
                label,
                wave,
                error,
            } => tracing::warn!(
                target: "relaykit::wire",
                %component, label, %wave, %error,
                "input rejected"
            ),
            WireEvent::Rollback {
                component,
                label,
                wave,
                restored,
            } => tracing::warn!(
                target: "relaykit::wire",
                %component, label, %wave, restored,
                "source rolled back"
            ),
        }
    }
}
