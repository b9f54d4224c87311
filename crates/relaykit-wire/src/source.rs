//! Primitive sources: the permanent battery and the externally driven switch.

use std::fmt;

use relaykit_core::{CircuitError, Emitter, Settled, Wave, WireEvent};

use crate::board::Board;
use crate::pin::Pin;
use crate::publisher::{Driver, Publisher};

/// A constant true source.
///
/// Its level never changes, so it never starts a wave; it only seeds
/// relay chains and inverters.
pub struct Battery {
    output: Publisher,
}

impl Battery {
    /// A fresh, permanently energized battery.
    pub fn new(board: &Board) -> Self {
        Self {
            output: Driver::new(board, "battery", true).publisher(),
        }
    }
}

impl Emitter for Battery {
    fn emitting(&self) -> bool {
        self.output.emitting()
    }
}

impl Pin for Battery {
    fn publisher(&self) -> &Publisher {
        &self.output
    }
}

impl fmt::Debug for Battery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battery").field("id", &self.output.id()).finish()
    }
}

/// A level source driven from outside the circuit.
///
/// Every mutator starts exactly one wave when the level actually
/// changes and none otherwise. If the settled wave leaves a component
/// rejecting its inputs, the switch restores its previous level in a
/// compensating wave and returns the fault, so a rejected change leaves
/// the circuit in its last stable state.
///
/// Mutators hold the board's wave lock (see [`Board::lock_waves`]) from
/// the read of the current level through the rollback, so switches on
/// one board may be driven from any number of threads.
pub struct Switch {
    board: Board,
    driver: Driver,
    output: Publisher,
}

impl Switch {
    /// A switch labelled `"switch"` starting at `initial`.
    pub fn new(board: &Board, initial: bool) -> Self {
        Self::labeled(board, "switch", initial)
    }

    /// A switch with a diagnostic label.
    pub fn labeled(board: &Board, label: impl Into<String>, initial: bool) -> Self {
        let driver = Driver::new(board, label, initial);
        let output = driver.publisher();
        Self {
            board: board.clone(),
            driver,
            output,
        }
    }

    /// Energize the switch.
    pub fn turn_on(&self) -> Result<Settled, CircuitError> {
        self.set(true)
    }

    /// De-energize the switch.
    pub fn turn_off(&self) -> Result<Settled, CircuitError> {
        self.set(false)
    }

    /// Invert the current level. Always starts a wave.
    pub fn toggle(&self) -> Result<Settled, CircuitError> {
        let _waves = self.board.lock_waves();
        self.apply(!self.driver.emitting())
    }

    /// Drive the switch to `level`.
    pub fn set(&self, level: bool) -> Result<Settled, CircuitError> {
        let _waves = self.board.lock_waves();
        self.apply(level)
    }

    fn apply(&self, level: bool) -> Result<Settled, CircuitError> {
        let previous = self.driver.emitting();
        if previous == level {
            return Ok(Settled::Unchanged);
        }

        let wave = Wave::begin();
        self.driver.drive(level, &wave);
        match wave.settle() {
            Ok(report) => Ok(Settled::Wave(report)),
            Err(err) => {
                self.board.emit(&WireEvent::Rollback {
                    component: self.output.id(),
                    label: self.output.label(),
                    wave: wave.id(),
                    restored: previous,
                });
                let undo = Wave::begin();
                self.driver.drive(previous, &undo);
                if let Err(undo_err) = undo.settle() {
                    tracing::warn!(
                        target: "relaykit::wire",
                        component = %self.output.id(),
                        error = %undo_err,
                        "rollback wave did not settle cleanly"
                    );
                }
                Err(err)
            }
        }
    }
}

impl Emitter for Switch {
    fn emitting(&self) -> bool {
        self.output.emitting()
    }
}

impl Pin for Switch {
    fn publisher(&self) -> &Publisher {
        &self.output
    }
}

impl fmt::Debug for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switch")
            .field("label", &self.output.label())
            .field("on", &self.output.emitting())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaykit_core::ComponentId;

    #[test]
    fn battery_is_always_on() {
        let battery = Battery::new(&Board::default());
        assert!(battery.emitting());
        assert_eq!(battery.publisher().subscriber_count(), 0);
    }

    #[test]
    fn switch_reports_waves_only_on_change() {
        let switch = Switch::new(&Board::default(), false);
        assert_eq!(switch.turn_off(), Ok(Settled::Unchanged));
        let settled = switch.turn_on().unwrap();
        assert!(settled.changed());
        assert_eq!(settled.report().unwrap().transitions, 1);
        assert!(switch.emitting());
        assert_eq!(switch.turn_on(), Ok(Settled::Unchanged));
    }

    #[test]
    fn toggle_flips_level() {
        let switch = Switch::labeled(&Board::default(), "clk", true);
        switch.toggle().unwrap();
        assert!(!switch.emitting());
        switch.toggle().unwrap();
        assert!(switch.emitting());
    }

    #[test]
    fn faulted_wave_rolls_back() {
        let switch = Switch::new(&Board::default(), false);
        let guard = ComponentId::next();
        switch
            .publisher()
            .subscribe(move |sig| {
                if sig.value() {
                    sig.wave()
                        .raise(guard, CircuitError::EmptyGate { gate: "TEST" });
                }
                crate::publisher::Delivery::Delivered
            })
            .unwrap();

        let err = switch.turn_on();
        assert_eq!(err, Err(CircuitError::EmptyGate { gate: "TEST" }));
        assert!(!switch.emitting());
    }
}
