//! Board and oscillator configuration, validation, and error types.
//!
//! [`BoardConfig`] is the input for constructing a [`Board`](crate::Board),
//! the construction context every component is built against.
//! [`validate()`](BoardConfig::validate) checks structural invariants
//! before the board accepts it.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use relaykit_core::{NoopObserver, Observer};

// ── FanOut ─────────────────────────────────────────────────────────

/// How a publisher delivers a new level to its subscribers.
///
/// Both strategies block until every handler, and everything those
/// handlers transitively trigger, has finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FanOut {
    /// Handlers run in registration order on the driving thread.
    #[default]
    Inline,
    /// Broadcasts with at least `min_subscribers` handlers run each
    /// handler but the last on a scoped worker thread; the last runs on
    /// the driving thread. Smaller broadcasts run inline.
    Threaded {
        /// Subscriber count at which a broadcast goes parallel. Must be >= 2.
        min_subscribers: usize,
    },
}

// ── BoardConfig ────────────────────────────────────────────────────

/// Configuration for a [`Board`](crate::Board).
#[derive(Clone)]
pub struct BoardConfig {
    /// Delivery strategy for every publisher built on the board. Default: inline.
    pub fan_out: FanOut,
    /// Receives every wire event. Default: [`NoopObserver`].
    pub observer: Arc<dyn Observer>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            fan_out: FanOut::Inline,
            observer: Arc::new(NoopObserver),
        }
    }
}

impl fmt::Debug for BoardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardConfig")
            .field("fan_out", &self.fan_out)
            .finish_non_exhaustive()
    }
}

impl BoardConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let FanOut::Threaded { min_subscribers } = self.fan_out {
            if min_subscribers < 2 {
                return Err(ConfigError::FanOutThreshold {
                    configured: min_subscribers,
                });
            }
        }
        Ok(())
    }
}

// ── OscillatorConfig ───────────────────────────────────────────────

/// Configuration for a background [`Oscillator`](crate::Oscillator) runner.
#[derive(Clone, Debug)]
pub struct OscillatorConfig {
    /// Time between consecutive level flips. Default: 10 ms.
    pub half_period: Duration,
    /// Stop on its own after this many flip attempts, counting rejected
    /// flips as well as accepted ones. `None` = run until stopped.
    pub max_flips: Option<u64>,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            half_period: Duration::from_millis(10),
            max_flips: None,
        }
    }
}

impl OscillatorConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.half_period.is_zero() {
            return Err(ConfigError::ZeroHalfPeriod);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating configuration or starting threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `FanOut::Threaded` with a threshold below 2.
    FanOutThreshold {
        /// The configured threshold.
        configured: usize,
    },
    /// An oscillator was configured with a zero half period.
    ZeroHalfPeriod,
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FanOutThreshold { configured } => write!(
                f,
                "threaded fan-out threshold must be at least 2, got {configured}"
            ),
            Self::ZeroHalfPeriod => write!(f, "oscillator half period must be non-zero"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {}
