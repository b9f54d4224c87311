//! The construction context shared by every component of a circuit.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use relaykit_core::{Observer, TracingObserver, WireEvent};

use crate::config::{BoardConfig, ConfigError, FanOut};

/// Construction context for a circuit.
///
/// Carries the fan-out strategy and the observer that every publisher
/// built against it will use. Cloning is cheap; clones share the same
/// configuration. Components built on different boards may be wired
/// together freely, each publisher keeping its own board's settings.
///
/// A board also owns the wave lock. Waves started through it run one at
/// a time, so each settles against the state the previous one left.
#[derive(Clone)]
pub struct Board {
    config: Arc<BoardConfig>,
    waves: Arc<Mutex<()>>,
}

impl Board {
    /// Validate `config` and build a board from it.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: BoardConfig) -> Self {
        Self {
            config: Arc::new(config),
            waves: Arc::new(Mutex::new(())),
        }
    }

    /// A board that fans out to scoped worker threads whenever a
    /// publisher has two or more subscribers.
    pub fn threaded() -> Self {
        Self::from_config(BoardConfig {
            fan_out: FanOut::Threaded { min_subscribers: 2 },
            ..Default::default()
        })
    }

    /// An inline board whose events go to `tracing`.
    pub fn traced() -> Self {
        Self::with_observer(Arc::new(TracingObserver))
    }

    /// An inline board reporting to `observer`.
    pub fn with_observer(observer: Arc<dyn Observer>) -> Self {
        Self::from_config(BoardConfig {
            observer,
            ..Default::default()
        })
    }

    /// The delivery strategy.
    pub fn fan_out(&self) -> FanOut {
        self.config.fan_out
    }

    /// Hand `event` to the board's observer.
    pub fn emit(&self, event: &WireEvent<'_>) {
        self.config.observer.observe(event);
    }

    /// Hold the board's wave lock until the guard drops.
    ///
    /// [`Switch`](crate::Switch) mutators and the first delivery of
    /// [`Publisher::subscribe`](crate::Publisher::subscribe) take it for
    /// the whole wave, rollback included. Code that starts its own waves
    /// with [`Driver::drive`](crate::Driver::drive) should hold it too.
    ///
    /// The lock is not re-entrant: a subscriber must not toggle a switch
    /// or subscribe on the board whose wave is delivering to it.
    pub fn lock_waves(&self) -> MutexGuard<'_, ()> {
        self.waves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::from_config(BoardConfig::default())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fan_out", &self.config.fan_out)
            .finish_non_exhaustive()
    }
}
