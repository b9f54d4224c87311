//! A row of D latches sharing one clock.

use std::fmt;

use relaykit_core::{render_bits, BusError, CircuitError};
use relaykit_wire::{Board, Pin, Publisher};

use crate::d_latch::DLatch;

/// N [`DLatch`]es loaded together by a shared `clock` and, optionally,
/// cleared together by a shared `clear`.
///
/// Data pins are given most significant first, like every other
/// multi-bit composite, and [`render`](LatchBank::render) reads the
/// stored word back in the same order.
pub struct LatchBank {
    latches: Vec<DLatch>,
}

impl LatchBank {
    /// Wire one latch per data pin.
    pub fn new(
        board: &Board,
        data: &[&dyn Pin],
        clock: &dyn Pin,
        clear: Option<&dyn Pin>,
    ) -> Result<Self, CircuitError> {
        if data.is_empty() {
            return Err(BusError::Empty.into());
        }
        let latches = data
            .iter()
            .map(|&bit| match clear {
                Some(clear) => DLatch::with_clear(board, bit, clock, clear),
                None => DLatch::new(board, bit, clock),
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            target: "relaykit::latch",
            width = latches.len(),
            clear = clear.is_some(),
            "latch bank wired"
        );
        Ok(Self { latches })
    }

    /// Number of stored bits.
    pub fn width(&self) -> usize {
        self.latches.len()
    }

    /// The latches, most significant first.
    pub fn latches(&self) -> &[DLatch] {
        &self.latches
    }

    /// `Q` outputs, most significant first.
    pub fn q(&self) -> Vec<&Publisher> {
        self.latches.iter().map(DLatch::q).collect()
    }

    /// The stored word, most significant first.
    pub fn render(&self) -> String {
        render_bits(&self.latches)
    }
}

impl fmt::Display for LatchBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for LatchBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatchBank")
            .field("width", &self.width())
            .field("stored", &self.render())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaykit_wire::Switch;

    #[test]
    fn empty_bank_rejected() {
        let board = Board::default();
        let clock = Switch::new(&board, false);
        assert_eq!(
            LatchBank::new(&board, &[], &clock, None).err(),
            Some(CircuitError::Bus(BusError::Empty))
        );
    }

    #[test]
    fn loads_on_clock_and_holds() {
        let board = Board::default();
        let bits: Vec<Switch> = [true, false, true]
            .into_iter()
            .map(|v| Switch::new(&board, v))
            .collect();
        let pins: Vec<&dyn Pin> = bits.iter().map(|s| s as &dyn Pin).collect();
        let clock = Switch::new(&board, false);
        let bank = LatchBank::new(&board, &pins, &clock, None).unwrap();
        assert_eq!(bank.width(), 3);
        assert_eq!(bank.render(), "000");

        clock.turn_on().unwrap();
        assert_eq!(bank.render(), "101");
        clock.turn_off().unwrap();
        bits[1].turn_on().unwrap();
        assert_eq!(bank.to_string(), "101");
        assert_eq!(bank.q().len(), 3);
    }

    #[test]
    fn shared_clear_zeroes_every_bit() {
        let board = Board::threaded();
        let one = Switch::new(&board, true);
        let clock = Switch::new(&board, true);
        let clear = Switch::new(&board, false);
        let bank = LatchBank::new(&board, &[&one, &one], &clock, Some(&clear)).unwrap();
        assert_eq!(bank.render(), "11");
        clock.turn_off().unwrap();
        clear.turn_on().unwrap();
        assert_eq!(bank.render(), "00");
        clear.turn_off().unwrap();
        assert_eq!(bank.render(), "00");
    }
}
