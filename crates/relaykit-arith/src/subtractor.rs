//! Two's-complement subtraction on top of the ripple adder.

use std::fmt;

use relaykit_core::{BusError, CircuitError};
use relaykit_gates::XorGate;
use relaykit_wire::{Battery, Board, Pin, Publisher};

use crate::bus::Bus;
use crate::ripple::{Operands, RippleAdder};

/// `a - b` over N bits, as `a + !b + 1`.
///
/// Every subtrahend bit passes through an XOR against a battery (the
/// one's complement) and the adder's carry-in is a battery (the `+ 1`).
/// The final carry-out is the no-borrow flag: high when `a >= b`.
pub struct RippleSubtractor {
    adder: RippleAdder,
    inverted: Vec<XorGate>,
    operands: Option<Operands>,
}

impl RippleSubtractor {
    /// Wire a subtractor over existing pins, most significant first.
    pub fn new(board: &Board, a: &[&dyn Pin], b: &[&dyn Pin]) -> Result<Self, CircuitError> {
        if a.len() != b.len() {
            return Err(BusError::WidthMismatch {
                left: a.len(),
                right: b.len(),
            }
            .into());
        }
        let invert = Battery::new(board);
        let inverted = b
            .iter()
            .map(|&bit| XorGate::new(board, bit, &invert))
            .collect::<Result<Vec<_>, _>>()?;
        let complement: Vec<&dyn Pin> = inverted.iter().map(|x| x as &dyn Pin).collect();
        let adder = RippleAdder::new(board, a, &complement, &invert)?;
        Ok(Self {
            adder,
            inverted,
            operands: None,
        })
    }

    /// Build operand buses from two `width`-bit strings and subtract.
    ///
    /// Both strings are validated before anything is built.
    pub fn parse(board: &Board, width: usize, bits1: &str, bits2: &str) -> Result<Self, CircuitError> {
        let operands = Operands::parse(board, width, bits1, bits2)?;
        let mut subtractor = Self::new(board, &operands.a.pins(), &operands.b.pins())?;
        subtractor.operands = Some(operands);
        Ok(subtractor)
    }

    /// Number of bits per operand.
    pub fn width(&self) -> usize {
        self.adder.width()
    }

    /// The adder's carry-out: high when no borrow occurred.
    pub fn carry_out(&self) -> &Publisher {
        self.adder.carry_out()
    }

    /// Whether `a < b`, i.e. the difference wrapped.
    pub fn is_negative(&self) -> bool {
        !self.adder.carry_out().emitting()
    }

    /// The N difference bits (two's complement), most significant first.
    pub fn difference_bits(&self) -> String {
        self.adder.sum_bits()
    }

    /// Difference pins, most significant first.
    pub fn difference(&self) -> Vec<&Publisher> {
        self.adder.sum()
    }

    /// Carry-out followed by the difference bits.
    pub fn render(&self) -> String {
        self.adder.render()
    }

    /// The complemented subtrahend, most significant first.
    pub fn complement_bits(&self) -> String {
        relaykit_core::render_bits(&self.inverted)
    }

    /// The operand buses, if built by [`parse`](RippleSubtractor::parse).
    pub fn operands(&self) -> Option<(&Bus, &Bus)> {
        self.operands.as_ref().map(|o| (&o.a, &o.b))
    }
}

impl fmt::Display for RippleSubtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for RippleSubtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RippleSubtractor")
            .field("width", &self.width())
            .field("result", &self.render())
            .finish()
    }
}
