//! One-bit half and full adders.

use std::fmt;

use relaykit_core::{CircuitError, Emitter};
use relaykit_gates::{AndGate, OrGate, XorGate};
use relaykit_wire::{Board, Pin, Publisher};

/// `sum = a XOR b`, `carry = a AND b`.
pub struct HalfAdder {
    sum: XorGate,
    carry: AndGate,
}

impl HalfAdder {
    /// Wire a half adder on `a` and `b`.
    pub fn new(board: &Board, a: &dyn Pin, b: &dyn Pin) -> Result<Self, CircuitError> {
        Ok(Self {
            sum: XorGate::new(board, a, b)?,
            carry: AndGate::new(board, &[a, b])?,
        })
    }

    /// The sum bit.
    pub fn sum(&self) -> &Publisher {
        self.sum.publisher()
    }

    /// The carry bit.
    pub fn carry(&self) -> &Publisher {
        self.carry.publisher()
    }
}

impl fmt::Debug for HalfAdder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HalfAdder")
            .field("sum", &self.sum.emitting())
            .field("carry", &self.carry.emitting())
            .finish()
    }
}

/// Two chained half adders: `sum = (a XOR b) XOR cin`,
/// `carry = (a AND b) OR ((a XOR b) AND cin)`.
pub struct FullAdder {
    second: HalfAdder,
    carry: OrGate,
}

impl FullAdder {
    /// Wire a full adder on `a`, `b` and `carry_in`.
    pub fn new(
        board: &Board,
        a: &dyn Pin,
        b: &dyn Pin,
        carry_in: &dyn Pin,
    ) -> Result<Self, CircuitError> {
        let first = HalfAdder::new(board, a, b)?;
        let second = HalfAdder::new(board, first.sum(), carry_in)?;
        let carry = OrGate::new(board, &[first.carry(), second.carry()])?;
        Ok(Self { second, carry })
    }

    /// The sum bit.
    pub fn sum(&self) -> &Publisher {
        self.second.sum()
    }

    /// The carry-out bit.
    pub fn carry(&self) -> &Publisher {
        self.carry.publisher()
    }
}

impl fmt::Debug for FullAdder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullAdder")
            .field("sum", &self.sum().emitting())
            .field("carry", &self.carry().emitting())
            .finish()
    }
}
