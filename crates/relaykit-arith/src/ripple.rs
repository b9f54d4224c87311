//! Width-parameterised ripple-carry adder.

use std::fmt;

use relaykit_core::{render_bits, BusError, CircuitError};
use relaykit_wire::{Board, Pin, Publisher, Switch};

use crate::adder::FullAdder;
use crate::bus::{parse_bits, Bus};

/// Input buses owned by a circuit built from bit-strings.
pub(crate) struct Operands {
    pub(crate) a: Bus,
    pub(crate) b: Bus,
}

impl Operands {
    /// Validate both strings, then build both buses.
    pub(crate) fn parse(
        board: &Board,
        width: usize,
        bits1: &str,
        bits2: &str,
    ) -> Result<Self, BusError> {
        let a = parse_bits(width, bits1)?;
        let b = parse_bits(width, bits2)?;
        Ok(Self {
            a: Bus::from_levels(board, "a", &a),
            b: Bus::from_levels(board, "b", &b),
        })
    }
}

/// `a + b + carry_in` over N bits.
///
/// Operands are given most significant bit first and wired least
/// significant first: stage 0 adds the last pins and takes `carry_in`,
/// each later stage takes the previous stage's carry-out.
///
/// # Examples
///
/// ```
/// use relaykit_arith::RippleAdder;
/// use relaykit_wire::Board;
///
/// let board = Board::default();
/// let adder = RippleAdder::parse(&board, 8, "10011101", "11010110", false).unwrap();
/// assert_eq!(adder.render(), "101110011");
/// assert_eq!(adder.sum_bits(), "01110011");
/// ```
pub struct RippleAdder {
    /// Least significant stage first.
    stages: Vec<FullAdder>,
    carry_out: Publisher,
    operands: Option<Operands>,
    carry_in: Option<Switch>,
}

impl RippleAdder {
    /// Wire an adder over existing pins. `a` and `b` are most significant
    /// first and must have the same non-zero width.
    pub fn new(
        board: &Board,
        a: &[&dyn Pin],
        b: &[&dyn Pin],
        carry_in: &dyn Pin,
    ) -> Result<Self, CircuitError> {
        if a.is_empty() {
            return Err(BusError::Empty.into());
        }
        if a.len() != b.len() {
            return Err(BusError::WidthMismatch {
                left: a.len(),
                right: b.len(),
            }
            .into());
        }

        let mut stages: Vec<FullAdder> = Vec::with_capacity(a.len());
        for (&bit_a, &bit_b) in a.iter().rev().zip(b.iter().rev()) {
            let stage = match stages.last() {
                Some(prev) => FullAdder::new(board, bit_a, bit_b, prev.carry())?,
                None => FullAdder::new(board, bit_a, bit_b, carry_in)?,
            };
            stages.push(stage);
        }
        let carry_out = match stages.last() {
            Some(stage) => stage.carry().clone(),
            None => return Err(BusError::Empty.into()),
        };
        tracing::debug!(
            target: "relaykit::arith",
            width = stages.len(),
            "ripple adder wired"
        );
        Ok(Self {
            stages,
            carry_out,
            operands: None,
            carry_in: None,
        })
    }

    /// Build input buses from two `width`-bit strings and add them.
    ///
    /// Both strings are validated before anything is built.
    pub fn parse(
        board: &Board,
        width: usize,
        bits1: &str,
        bits2: &str,
        carry_in: bool,
    ) -> Result<Self, CircuitError> {
        let operands = Operands::parse(board, width, bits1, bits2)?;
        let carry = Switch::labeled(board, "carry_in", carry_in);
        let mut adder = Self::new(board, &operands.a.pins(), &operands.b.pins(), &carry)?;
        adder.operands = Some(operands);
        adder.carry_in = Some(carry);
        Ok(adder)
    }

    /// Number of bits per operand.
    pub fn width(&self) -> usize {
        self.stages.len()
    }

    /// The final stage's carry-out.
    pub fn carry_out(&self) -> &Publisher {
        &self.carry_out
    }

    /// Sum pins, most significant first.
    pub fn sum(&self) -> Vec<&Publisher> {
        self.stages.iter().rev().map(FullAdder::sum).collect()
    }

    /// The N sum bits as a string, most significant first.
    pub fn sum_bits(&self) -> String {
        render_bits(self.sum())
    }

    /// Carry-out followed by the sum bits: N + 1 characters.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.width() + 1);
        out.push(if self.carry_out().emitting() { '1' } else { '0' });
        out.push_str(&self.sum_bits());
        out
    }

    /// The operand buses, if this adder was built by [`parse`](RippleAdder::parse).
    pub fn operands(&self) -> Option<(&Bus, &Bus)> {
        self.operands.as_ref().map(|o| (&o.a, &o.b))
    }

    /// The carry-in switch, if this adder was built by [`parse`](RippleAdder::parse).
    pub fn carry_in(&self) -> Option<&Switch> {
        self.carry_in.as_ref()
    }
}

impl fmt::Display for RippleAdder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for RippleAdder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RippleAdder")
            .field("width", &self.width())
            .field("result", &self.render())
            .finish()
    }
}
