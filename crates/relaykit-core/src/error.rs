//! Error types for the relaykit logic simulator.
//!
//! Organized by subsystem: bus (bit-string validation) and circuit
//! (construction and wave settlement).

use std::error::Error;
use std::fmt;

use crate::id::{ComponentId, WaveId};

/// Errors from validating an N-bit bus description.
///
/// Always reported before any component is built, so a failed bus
/// constructor leaves no partial wiring behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusError {
    /// A bus of zero bits was requested.
    Empty,
    /// The bit-string does not have the expected number of bits.
    WrongLength {
        /// Width the bus was declared with.
        expected: usize,
        /// Number of characters actually supplied.
        actual: usize,
    },
    /// The bit-string contains a character other than `'0'` or `'1'`.
    NonBinary {
        /// Zero-based character position, counted from the left.
        position: usize,
        /// The offending character.
        found: char,
    },
    /// Two buses that must be paired bit-by-bit differ in width.
    WidthMismatch {
        /// Width of the left-hand operand.
        left: usize,
        /// Width of the right-hand operand.
        right: usize,
    },
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "bus must have at least one bit"),
            Self::WrongLength { expected, actual } => {
                write!(f, "expected {expected} bits, got {actual}")
            }
            Self::NonBinary { position, found } => {
                write!(f, "non-binary character {found:?} at position {position}")
            }
            Self::WidthMismatch { left, right } => {
                write!(f, "bus width mismatch: {left} vs {right}")
            }
        }
    }
}

impl Error for BusError {}

/// Errors from building circuits or settling a propagation wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CircuitError {
    /// A bus description failed validation.
    Bus(BusError),
    /// A component's inputs reached a configuration it must reject
    /// (e.g. set and reset asserted together on an RS flip-flop).
    InvalidInput {
        /// The component that detected the condition.
        component: ComponentId,
        /// Human-readable label of that component.
        label: String,
        /// The wave that left the inputs in this state, if any.
        wave: Option<WaveId>,
        /// Description of the rejected condition.
        reason: String,
    },
    /// A multi-input gate was built with no input pins.
    EmptyGate {
        /// The gate family (e.g. `"AND"`).
        gate: &'static str,
    },
}

impl fmt::Display for CircuitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "invalid bus: {e}"),
            Self::InvalidInput {
                component,
                label,
                wave,
                reason,
            } => {
                write!(f, "invalid input on '{label}' ({component}): {reason}")?;
                if let Some(w) = wave {
                    write!(f, " during wave {w}")?;
                }
                Ok(())
            }
            Self::EmptyGate { gate } => write!(f, "{gate} gate requires at least one pin"),
        }
    }
}

impl Error for CircuitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bus(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BusError> for CircuitError {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}
