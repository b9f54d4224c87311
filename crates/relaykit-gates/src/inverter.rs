//! NOT: a single battery-fed relay read through its open contact.

use std::fmt;

use relaykit_core::{CircuitError, Emitter};
use relaykit_wire::{Battery, Board, Pin, Publisher, Relay};

use crate::gate::{describe, Gate, GateKind};

/// High exactly when its input is low.
pub struct Inverter {
    input: [Publisher; 1],
    output: Publisher,
}

impl Inverter {
    /// Wire an inverter on `pin`.
    pub fn new(board: &Board, pin: &dyn Pin) -> Result<Self, CircuitError> {
        Self::labeled(board, "not", pin)
    }

    /// Like [`new`](Inverter::new), with a diagnostic label.
    pub fn labeled(board: &Board, label: &str, pin: &dyn Pin) -> Result<Self, CircuitError> {
        let battery = Battery::new(board);
        let relay = Relay::labeled(board, label, Some(&battery), Some(pin))?;
        Ok(Self {
            input: [pin.publisher().clone()],
            output: relay.open().clone(),
        })
    }
}

impl Emitter for Inverter {
    fn emitting(&self) -> bool {
        self.output.emitting()
    }
}

impl Pin for Inverter {
    fn publisher(&self) -> &Publisher {
        &self.output
    }
}

impl Gate for Inverter {
    fn kind(&self) -> GateKind {
        GateKind::Not
    }

    fn inputs(&self) -> &[Publisher] {
        &self.input
    }
}

impl fmt::Display for Inverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

impl fmt::Debug for Inverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inverter")
            .field("output", &self.output.emitting())
            .finish()
    }
}
