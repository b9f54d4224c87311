//! XOR and XNOR, composed from the other gates.

use std::fmt;

use relaykit_core::{CircuitError, Emitter};
use relaykit_wire::{Board, Pin, Publisher};

use crate::and::{AndGate, NandGate};
use crate::gate::{describe, Gate, GateKind};
use crate::inverter::Inverter;
use crate::or::OrGate;

/// High when exactly one of two inputs is high: `AND(OR(a, b), NAND(a, b))`.
///
/// # Examples
///
/// ```
/// use relaykit_core::Emitter;
/// use relaykit_gates::XorGate;
/// use relaykit_wire::{Board, Switch};
///
/// let board = Board::threaded();
/// let a = Switch::new(&board, true);
/// let b = Switch::new(&board, true);
/// let xor = XorGate::new(&board, &a, &b).unwrap();
/// assert!(!xor.emitting());
/// assert_eq!(xor.to_string(), "XOR(11) = 0");
/// ```
pub struct XorGate {
    inputs: [Publisher; 2],
    and: AndGate,
}

impl XorGate {
    /// Wire an XOR on `a` and `b`.
    pub fn new(board: &Board, a: &dyn Pin, b: &dyn Pin) -> Result<Self, CircuitError> {
        let or = OrGate::new(board, &[a, b])?;
        let nand = NandGate::new(board, &[a, b])?;
        let and = AndGate::new(board, &[&or, &nand])?;
        Ok(Self {
            inputs: [a.publisher().clone(), b.publisher().clone()],
            and,
        })
    }
}

impl Emitter for XorGate {
    fn emitting(&self) -> bool {
        self.and.emitting()
    }
}

impl Pin for XorGate {
    fn publisher(&self) -> &Publisher {
        self.and.publisher()
    }
}

impl Gate for XorGate {
    fn kind(&self) -> GateKind {
        GateKind::Xor
    }

    fn inputs(&self) -> &[Publisher] {
        &self.inputs
    }
}

impl fmt::Display for XorGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

impl fmt::Debug for XorGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XorGate")
            .field("output", &self.emitting())
            .finish()
    }
}

/// High when both inputs agree: `NOT(XOR(a, b))`.
pub struct XnorGate {
    xor: XorGate,
    not: Inverter,
}

impl XnorGate {
    /// Wire an XNOR on `a` and `b`.
    pub fn new(board: &Board, a: &dyn Pin, b: &dyn Pin) -> Result<Self, CircuitError> {
        let xor = XorGate::new(board, a, b)?;
        let not = Inverter::labeled(board, "xnor.out", &xor)?;
        Ok(Self { xor, not })
    }
}

impl Emitter for XnorGate {
    fn emitting(&self) -> bool {
        self.not.emitting()
    }
}

impl Pin for XnorGate {
    fn publisher(&self) -> &Publisher {
        self.not.publisher()
    }
}

impl Gate for XnorGate {
    fn kind(&self) -> GateKind {
        GateKind::Xnor
    }

    fn inputs(&self) -> &[Publisher] {
        self.xor.inputs()
    }
}

impl fmt::Display for XnorGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

impl fmt::Debug for XnorGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XnorGate")
            .field("output", &self.emitting())
            .finish()
    }
}
