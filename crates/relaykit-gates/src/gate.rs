//! The [`Gate`] trait and the kinds of gate the family provides.

use std::fmt;

use relaykit_core::render_bits;
use relaykit_wire::{Pin, Publisher};

/// Which boolean function a gate computes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// All inputs high.
    And,
    /// Any input high.
    Or,
    /// Not all inputs high.
    Nand,
    /// No input high.
    Nor,
    /// Exactly one of two inputs high.
    Xor,
    /// Both of two inputs equal.
    Xnor,
    /// Single input, inverted.
    Not,
}

impl GateKind {
    /// Upper-case mnemonic, e.g. `"NAND"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Xnor => "XNOR",
            Self::Not => "NOT",
        }
    }

    /// The function itself, evaluated over `inputs`.
    ///
    /// `Xor`/`Xnor` generalise to parity; `Not` reads the first input.
    pub fn eval(self, inputs: &[bool]) -> bool {
        let all = inputs.iter().all(|&b| b);
        let any = inputs.iter().any(|&b| b);
        let odd = inputs.iter().filter(|&&b| b).count() % 2 == 1;
        match self {
            Self::And => all,
            Self::Or => any,
            Self::Nand => !all,
            Self::Nor => !any,
            Self::Xor => odd,
            Self::Xnor => !odd,
            Self::Not => !inputs.first().copied().unwrap_or(false),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A relay composition with one output and a fixed boolean function.
///
/// Every gate is a [`Pin`], so gates feed gates, adders and latches
/// directly. The output has already settled against the inputs' levels
/// when the constructor returns.
pub trait Gate: Pin {
    /// Which function this gate computes.
    fn kind(&self) -> GateKind;

    /// The input pins, in the order they were given.
    fn inputs(&self) -> &[Publisher];

    /// The output pin.
    fn output(&self) -> &Publisher {
        self.publisher()
    }
}

/// `KIND(inputs) = output`, e.g. `AND(10) = 0`.
pub(crate) fn describe(gate: &dyn Gate, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "{}({}) = {}",
        gate.kind(),
        render_bits(gate.inputs()),
        u8::from(gate.emitting())
    )
}
