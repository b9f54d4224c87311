//! Level-sensitive D latch.

use std::fmt;

use relaykit_core::{CircuitError, Emitter};
use relaykit_gates::{AndGate, Gate, Inverter, OrGate};
use relaykit_wire::{Board, Pin, Publisher};

use crate::rs::RsFlipFlop;

/// A D latch: while `clock` is high `Q` follows `data`, while it is low
/// `Q` holds.
///
/// Built as an [`RsFlipFlop`] with `S = AND(data, clock)` and
/// `R = AND(NOT data, clock)`. The optional clear input forces `Q` low
/// regardless of clock and data.
///
/// # Examples
///
/// ```
/// use relaykit_core::Emitter;
/// use relaykit_latch::DLatch;
/// use relaykit_wire::{Board, Switch};
///
/// let board = Board::default();
/// let data = Switch::new(&board, true);
/// let clock = Switch::new(&board, false);
/// let latch = DLatch::new(&board, &data, &clock).unwrap();
/// assert!(!latch.emitting());
///
/// clock.turn_on().unwrap();
/// assert!(latch.emitting());
/// clock.turn_off().unwrap();
/// data.turn_off().unwrap();
/// assert!(latch.emitting());
/// ```
pub struct DLatch {
    set: Box<dyn Gate>,
    reset: Box<dyn Gate>,
    flip_flop: RsFlipFlop,
}

impl DLatch {
    /// Wire a latch on `data` gated by `clock`.
    pub fn new(board: &Board, data: &dyn Pin, clock: &dyn Pin) -> Result<Self, CircuitError> {
        let set = AndGate::new(board, &[data, clock])?;
        let not_data = Inverter::new(board, data)?;
        let reset = AndGate::new(board, &[&not_data, clock])?;
        Self::assemble(board, Box::new(set), Box::new(reset))
    }

    /// Wire a latch with an asynchronous clear.
    ///
    /// `clear` high forces `Q` low and, while it stays high, inhibits the
    /// set path so a concurrent `data`/`clock` high cannot assert both
    /// flip-flop inputs.
    pub fn with_clear(
        board: &Board,
        data: &dyn Pin,
        clock: &dyn Pin,
        clear: &dyn Pin,
    ) -> Result<Self, CircuitError> {
        let not_clear = Inverter::new(board, clear)?;
        let set = AndGate::new(board, &[data, clock, &not_clear])?;
        let not_data = Inverter::new(board, data)?;
        let load_low = AndGate::new(board, &[&not_data, clock])?;
        let reset = OrGate::new(board, &[clear, &load_low])?;
        Self::assemble(board, Box::new(set), Box::new(reset))
    }

    fn assemble(
        board: &Board,
        set: Box<dyn Gate>,
        reset: Box<dyn Gate>,
    ) -> Result<Self, CircuitError> {
        let flip_flop = RsFlipFlop::labeled(board, "d", reset.output(), set.output())?;
        Ok(Self {
            set,
            reset,
            flip_flop,
        })
    }

    /// The `Q` output.
    pub fn q(&self) -> &Publisher {
        self.flip_flop.q()
    }

    /// The `QBar` output.
    pub fn q_bar(&self) -> &Publisher {
        self.flip_flop.q_bar()
    }

    /// The gate driving the flip-flop's set input.
    pub fn set_line(&self) -> &dyn Gate {
        &*self.set
    }

    /// The gate driving the flip-flop's reset input.
    pub fn reset_line(&self) -> &dyn Gate {
        &*self.reset
    }

    /// The underlying flip-flop.
    pub fn flip_flop(&self) -> &RsFlipFlop {
        &self.flip_flop
    }
}

impl Emitter for DLatch {
    fn emitting(&self) -> bool {
        self.flip_flop.emitting()
    }
}

impl Pin for DLatch {
    fn publisher(&self) -> &Publisher {
        self.q()
    }
}

impl fmt::Display for DLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.flip_flop, f)
    }
}

impl fmt::Debug for DLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DLatch")
            .field("set", &self.set.emitting())
            .field("reset", &self.reset.emitting())
            .field("q", &self.q().emitting())
            .finish()
    }
}
