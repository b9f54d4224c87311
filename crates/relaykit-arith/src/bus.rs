//! N-bit input buses described by bit-strings.

use std::fmt;

use relaykit_core::{render_bits, BusError, CircuitError, Emitter, WaveReport};
use relaykit_wire::{Board, Pin, Switch};

/// Check that `bits` matches `^[01]{width}$` and decode it.
///
/// Levels come back in the order written (most significant first).
/// Nothing is built, so a rejected string has no side effects.
pub fn parse_bits(width: usize, bits: &str) -> Result<Vec<bool>, BusError> {
    if width == 0 {
        return Err(BusError::Empty);
    }
    let actual = bits.chars().count();
    if actual != width {
        return Err(BusError::WrongLength {
            expected: width,
            actual,
        });
    }
    bits.chars()
        .enumerate()
        .map(|(position, c)| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            found => Err(BusError::NonBinary { position, found }),
        })
        .collect()
}

/// A row of switches, one per bit, most significant first.
///
/// Bits are paired with other buses by index only; nothing ties one bit
/// to another.
pub struct Bus {
    label: String,
    bits: Vec<Switch>,
}

impl Bus {
    /// An all-low bus of `width` bits.
    pub fn new(board: &Board, label: &str, width: usize) -> Result<Self, BusError> {
        if width == 0 {
            return Err(BusError::Empty);
        }
        Ok(Self::from_levels(board, label, &vec![false; width]))
    }

    /// A bus initialised from a `width`-character bit-string.
    pub fn parse(board: &Board, label: &str, width: usize, bits: &str) -> Result<Self, BusError> {
        let levels = parse_bits(width, bits)?;
        Ok(Self::from_levels(board, label, &levels))
    }

    pub(crate) fn from_levels(board: &Board, label: &str, levels: &[bool]) -> Self {
        let width = levels.len();
        let bits = levels
            .iter()
            .enumerate()
            .map(|(i, &level)| Switch::labeled(board, format!("{label}[{}]", width - 1 - i), level))
            .collect();
        Self {
            label: label.to_owned(),
            bits,
        }
    }

    /// Number of bits.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Diagnostic label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The bit switches, most significant first.
    pub fn bits(&self) -> &[Switch] {
        &self.bits
    }

    /// The bits as pins, most significant first.
    pub fn pins(&self) -> Vec<&dyn Pin> {
        self.bits.iter().map(|s| s as &dyn Pin).collect()
    }

    /// Drive the bus to a new bit-string.
    ///
    /// The string is validated in full before any bit changes. Each bit
    /// that changes starts its own wave, least significant first; one
    /// report per such wave is returned. If the circuit rejects a bit,
    /// that bit is rolled back, the bits already driven keep their new
    /// levels, and the rejection is returned.
    pub fn assign(&self, bits: &str) -> Result<Vec<WaveReport>, CircuitError> {
        let levels = parse_bits(self.width(), bits)?;
        let mut reports = Vec::new();
        for (switch, level) in self.bits.iter().zip(levels).rev() {
            if let Some(report) = switch.set(level)?.report() {
                reports.push(report.clone());
            }
        }
        Ok(reports)
    }

    /// The current levels as a bit-string, most significant first.
    pub fn render(&self) -> String {
        render_bits(&self.bits)
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("label", &self.label)
            .field("bits", &self.render())
            .finish()
    }
}

/// Whether the bus reads as non-zero.
impl Emitter for Bus {
    fn emitting(&self) -> bool {
        self.bits.iter().any(Emitter::emitting)
    }
}
