//! Clock source: a switch that flips on demand or from a background thread.
//!
//! The runner thread owns a clone of the oscillator's switch and flips it
//! once per half period until its shutdown flag is raised or it has
//! attempted its flip limit. The wait between flips is a `park_timeout`, so
//! [`OscillatorHandle::stop`] wakes it immediately instead of waiting out
//! the period.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use relaykit_core::{CircuitError, Emitter, Settled};

use crate::board::Board;
use crate::config::{ConfigError, OscillatorConfig};
use crate::pin::Pin;
use crate::publisher::Publisher;
use crate::source::Switch;

/// A level source whose level alternates.
pub struct Oscillator {
    switch: Arc<Switch>,
}

impl Oscillator {
    /// An oscillator labelled `"clock"` starting at `initial`.
    pub fn new(board: &Board, initial: bool) -> Self {
        Self::labeled(board, "clock", initial)
    }

    /// An oscillator with a diagnostic label.
    pub fn labeled(board: &Board, label: impl Into<String>, initial: bool) -> Self {
        Self {
            switch: Arc::new(Switch::labeled(board, label, initial)),
        }
    }

    /// Flip the level once and wait for the circuit to settle.
    ///
    /// A flip the circuit rejects is rolled back; see [`Switch`].
    pub fn tick(&self) -> Result<Settled, CircuitError> {
        self.switch.toggle()
    }

    /// Start flipping on a background thread.
    ///
    /// Manual [`tick`](Oscillator::tick)s remain possible while the
    /// runner is active. They serialize with its flips, and with every
    /// other wave on the oscillator's board, through the board's wave
    /// lock.
    pub fn run(&self, config: OscillatorConfig) -> Result<OscillatorHandle, ConfigError> {
        config.validate()?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let runner = Runner {
            switch: Arc::clone(&self.switch),
            shutdown: Arc::clone(&shutdown),
            half_period: config.half_period,
            max_flips: config.max_flips,
        };
        let thread = thread::Builder::new()
            .name(format!("relaykit-osc-{}", self.switch.publisher().id()))
            .spawn(move || runner.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;
        tracing::debug!(
            target: "relaykit::wire",
            component = %self.switch.publisher().id(),
            half_period_us = config.half_period.as_micros() as u64,
            "oscillator runner started"
        );
        Ok(OscillatorHandle {
            shutdown,
            thread: Some(thread),
        })
    }
}

impl Emitter for Oscillator {
    fn emitting(&self) -> bool {
        self.switch.emitting()
    }
}

impl Pin for Oscillator {
    fn publisher(&self) -> &Publisher {
        self.switch.publisher()
    }
}

impl fmt::Debug for Oscillator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Oscillator")
            .field("label", &self.switch.publisher().label())
            .field("level", &self.switch.emitting())
            .finish()
    }
}

/// What a runner thread did before it stopped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OscillatorStats {
    /// Flips the circuit accepted.
    pub flips: u64,
    /// Flips the circuit rejected and rolled back.
    pub faults: u64,
    /// The most recent rejection, if any.
    pub last_fault: Option<CircuitError>,
}

impl OscillatorStats {
    /// Flips tried, accepted or not. This is what
    /// [`OscillatorConfig::max_flips`] limits.
    pub fn attempts(&self) -> u64 {
        self.flips + self.faults
    }
}

struct Runner {
    switch: Arc<Switch>,
    shutdown: Arc<AtomicBool>,
    half_period: Duration,
    max_flips: Option<u64>,
}

impl Runner {
    fn run(self) -> OscillatorStats {
        let mut stats = OscillatorStats::default();
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }
            if self.max_flips.is_some_and(|max| stats.attempts() >= max) {
                break;
            }

            match self.switch.toggle() {
                Ok(_) => stats.flips += 1,
                Err(err) => {
                    tracing::warn!(
                        target: "relaykit::wire",
                        component = %self.switch.publisher().id(),
                        error = %err,
                        "oscillator flip rejected"
                    );
                    stats.faults += 1;
                    stats.last_fault = Some(err);
                }
            }

            self.wait();
        }
        stats
    }

    /// Park until the next flip is due or shutdown is requested.
    fn wait(&self) {
        let deadline = Instant::now() + self.half_period;
        while !self.shutdown.load(Ordering::Acquire) {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                break;
            };
            if remaining.is_zero() {
                break;
            }
            thread::park_timeout(remaining);
        }
    }
}

/// Control handle for a running oscillator thread.
///
/// Dropping the handle stops and joins the thread.
pub struct OscillatorHandle {
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<OscillatorStats>>,
}

impl OscillatorHandle {
    /// Raise the shutdown flag, wake the runner, and join it.
    ///
    /// Returns `None` if the runner was already stopped or panicked.
    pub fn stop(&mut self) -> Option<OscillatorStats> {
        self.shutdown.store(true, Ordering::Release);
        let handle = self.thread.take()?;
        handle.thread().unpark();
        handle.join().ok()
    }

    /// Whether the runner has exited on its own (flip limit reached).
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for OscillatorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for OscillatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OscillatorHandle")
            .field("running", &!self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::Delivery;
    use relaykit_core::ComponentId;

    #[test]
    fn tick_alternates() {
        let osc = Oscillator::new(&Board::default(), false);
        let mut levels = Vec::new();
        for _ in 0..4 {
            osc.tick().unwrap();
            levels.push(osc.emitting());
        }
        assert_eq!(levels, vec![true, false, true, false]);
    }

    #[test]
    fn run_rejects_zero_period() {
        let osc = Oscillator::new(&Board::default(), false);
        let config = OscillatorConfig {
            half_period: Duration::ZERO,
            max_flips: None,
        };
        assert_eq!(osc.run(config).err(), Some(ConfigError::ZeroHalfPeriod));
    }

    #[test]
    fn runner_stops_at_flip_limit() {
        let osc = Oscillator::new(&Board::default(), false);
        let mut handle = osc
            .run(OscillatorConfig {
                half_period: Duration::from_millis(1),
                max_flips: Some(5),
            })
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        let stats = handle.stop().unwrap();
        assert_eq!(stats.flips, 5);
        assert_eq!(stats.faults, 0);
        // Odd number of flips from low.
        assert!(osc.emitting());
        assert!(handle.stop().is_none());
    }

    #[test]
    fn stop_wakes_a_long_period() {
        let osc = Oscillator::new(&Board::default(), false);
        let mut handle = osc
            .run(OscillatorConfig {
                half_period: Duration::from_secs(60),
                max_flips: None,
            })
            .unwrap();
        let start = Instant::now();
        let stats = handle.stop().unwrap();
        assert!(start.elapsed() < Duration::from_secs(30));
        assert!(stats.flips <= 1);
    }

    #[test]
    fn rejected_flips_count_toward_the_limit() {
        let osc = Oscillator::new(&Board::default(), false);
        let guard = ComponentId::next();
        osc.publisher()
            .subscribe(move |sig| {
                if sig.value() {
                    sig.wave()
                        .raise(guard, CircuitError::EmptyGate { gate: "TEST" });
                }
                Delivery::Delivered
            })
            .unwrap();
        let mut handle = osc
            .run(OscillatorConfig {
                half_period: Duration::from_millis(1),
                max_flips: Some(3),
            })
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(handle.is_finished(), "runner kept going past its limit");
        let stats = handle.stop().unwrap();
        assert_eq!(stats.flips, 0);
        assert_eq!(stats.faults, 3);
        assert_eq!(stats.attempts(), 3);
        assert_eq!(
            stats.last_fault,
            Some(CircuitError::EmptyGate { gate: "TEST" })
        );
        assert!(!osc.emitting());
    }

    #[test]
    fn mixed_outcomes_share_one_limit() {
        use std::sync::atomic::AtomicU64;

        let osc = Oscillator::new(&Board::default(), false);
        let guard = ComponentId::next();
        let rising = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&rising);
        // Refuse every second rising edge.
        osc.publisher()
            .subscribe(move |sig| {
                if sig.value() && seen.fetch_add(1, Ordering::SeqCst) % 2 == 1 {
                    sig.wave()
                        .raise(guard, CircuitError::EmptyGate { gate: "TEST" });
                }
                Delivery::Delivered
            })
            .unwrap();

        // up, down, up (refused), up, down, up (refused)
        let mut handle = osc
            .run(OscillatorConfig {
                half_period: Duration::from_millis(1),
                max_flips: Some(6),
            })
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        let stats = handle.stop().unwrap();
        assert_eq!(stats.flips, 4);
        assert_eq!(stats.faults, 2);
        assert_eq!(stats.attempts(), 6);
        assert!(!osc.emitting());
    }
}
