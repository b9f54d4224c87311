//! AND and NAND: a battery-seeded chain of relays.

use std::fmt;

use relaykit_core::{CircuitError, Emitter};
use relaykit_wire::{Battery, Board, Pin, Publisher, Relay};
use smallvec::SmallVec;

use crate::gate::{describe, Gate, GateKind};

/// High exactly when every input is high.
///
/// Input `i` energizes the coil of relay `i`, whose feed is the previous
/// relay's closed contact (the battery for the first). The output is the
/// last relay's closed contact, so a low input anywhere breaks the chain.
///
/// # Examples
///
/// ```
/// use relaykit_core::Emitter;
/// use relaykit_gates::AndGate;
/// use relaykit_wire::{Board, Switch};
///
/// let board = Board::default();
/// let a = Switch::new(&board, true);
/// let b = Switch::new(&board, false);
/// let and = AndGate::new(&board, &[&a, &b]).unwrap();
/// assert!(!and.emitting());
///
/// b.turn_on().unwrap();
/// assert!(and.emitting());
/// ```
pub struct AndGate {
    inputs: SmallVec<[Publisher; 4]>,
    relays: SmallVec<[Relay; 4]>,
    output: Publisher,
}

impl AndGate {
    /// Wire an AND over `pins`.
    ///
    /// Returns [`CircuitError::EmptyGate`] if `pins` is empty.
    pub fn new(board: &Board, pins: &[&dyn Pin]) -> Result<Self, CircuitError> {
        let Some((first, rest)) = pins.split_first() else {
            return Err(CircuitError::EmptyGate {
                gate: GateKind::And.name(),
            });
        };
        let battery = Battery::new(board);
        let mut relays: SmallVec<[Relay; 4]> = SmallVec::with_capacity(pins.len());
        let mut tail = Relay::labeled(board, "and.0", Some(&battery), Some(*first))?;
        for (i, pin) in rest.iter().enumerate() {
            let label = format!("and.{}", i + 1);
            let next = Relay::labeled(board, &label, Some(tail.closed()), Some(*pin))?;
            relays.push(std::mem::replace(&mut tail, next));
        }
        let output = tail.closed().clone();
        relays.push(tail);
        Ok(Self {
            inputs: pins.iter().map(|p| p.publisher().clone()).collect(),
            relays,
            output,
        })
    }

    /// Number of relays in the chain (one per input).
    pub fn relay_count(&self) -> usize {
        self.relays.len()
    }
}

impl Emitter for AndGate {
    fn emitting(&self) -> bool {
        self.output.emitting()
    }
}

impl Pin for AndGate {
    fn publisher(&self) -> &Publisher {
        &self.output
    }
}

impl Gate for AndGate {
    fn kind(&self) -> GateKind {
        GateKind::And
    }

    fn inputs(&self) -> &[Publisher] {
        &self.inputs
    }
}

impl fmt::Display for AndGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

impl fmt::Debug for AndGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndGate")
            .field("inputs", &self.inputs.len())
            .field("output", &self.output.emitting())
            .finish()
    }
}

/// High unless every input is high.
///
/// The AND chain read through the open contact of one more
/// battery-seeded relay, whose coil is the chain's output.
pub struct NandGate {
    and: AndGate,
    output: Publisher,
}

impl NandGate {
    /// Wire a NAND over `pins`.
    pub fn new(board: &Board, pins: &[&dyn Pin]) -> Result<Self, CircuitError> {
        let and = AndGate::new(board, pins).map_err(|err| match err {
            CircuitError::EmptyGate { .. } => CircuitError::EmptyGate {
                gate: GateKind::Nand.name(),
            },
            other => other,
        })?;
        let battery = Battery::new(board);
        let negate = Relay::labeled(board, "nand.out", Some(&battery), Some(&and))?;
        Ok(Self {
            and,
            output: negate.open().clone(),
        })
    }
}

impl Emitter for NandGate {
    fn emitting(&self) -> bool {
        self.output.emitting()
    }
}

impl Pin for NandGate {
    fn publisher(&self) -> &Publisher {
        &self.output
    }
}

impl Gate for NandGate {
    fn kind(&self) -> GateKind {
        GateKind::Nand
    }

    fn inputs(&self) -> &[Publisher] {
        self.and.inputs()
    }
}

impl fmt::Display for NandGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

impl fmt::Debug for NandGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NandGate")
            .field("inputs", &self.and.inputs.len())
            .field("output", &self.output.emitting())
            .finish()
    }
}
