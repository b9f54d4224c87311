//! Cross-coupled NOR flip-flop with guarded inputs.
//!
//! # Construction
//!
//! The feedback edge from `Q` into `QBar`'s NOR is a [`Junction`]
//! holding low. `QBar` is wired first, `Q` is derived from it, and only
//! after that settling pass is the junction attached to `Q`. From then
//! on changes travel round the loop; the round trip ends when a NOR
//! re-derives the level it already accepted in the same wave.
//!
//! # Invalid input
//!
//! `R` and `S` reach the NORs through a guard. A wave that leaves both
//! asserted is not passed on: the guard keeps the last stable inputs
//! and records [`CircuitError::InvalidInput`] in the wave. A later
//! delivery within the same wave that resolves the conflict withdraws
//! the record, so gate-delay hazards (e.g. in a D latch) pass silently.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use relaykit_core::{CircuitError, ComponentId, Emitter, Wave, WireEvent};
use relaykit_gates::NorGate;
use relaykit_wire::{Board, Delivery, Driver, Junction, Pin, Publisher, WeakDriver};

const BOTH_ASSERTED: &str = "set and reset both asserted";

struct Guard {
    id: ComponentId,
    label: String,
    board: Board,
    reset: Publisher,
    set: Publisher,
    reset_in: WeakDriver,
    set_in: WeakDriver,
    /// Serializes the read-and-record step so the ledger reflects the
    /// last evaluation.
    check: Mutex<()>,
}

impl Guard {
    fn levels(&self) -> (bool, bool) {
        (self.reset.emitting(), self.set.emitting())
    }

    fn invalid(&self, wave: &Wave) -> CircuitError {
        CircuitError::InvalidInput {
            component: self.id,
            label: self.label.clone(),
            wave: Some(wave.id()),
            reason: BOTH_ASSERTED.to_owned(),
        }
    }

    fn evaluate(&self, wave: &Wave) {
        let reset_first = {
            let _check = self.check.lock().unwrap_or_else(PoisonError::into_inner);
            let (r, s) = self.levels();
            if r && s {
                let error = self.invalid(wave);
                self.board.emit(&WireEvent::Fault {
                    component: self.id,
                    label: &self.label,
                    wave: wave.id(),
                    error: &error,
                });
                wave.raise(self.id, error);
                return;
            }
            wave.clear(self.id);
            // Release the line being de-asserted first so the NORs never
            // see both guarded inputs high.
            !r
        };

        let order = if reset_first {
            [(&self.reset_in, 0), (&self.set_in, 1)]
        } else {
            [(&self.set_in, 1), (&self.reset_in, 0)]
        };
        for (line, index) in order {
            if let Some(driver) = line.upgrade() {
                driver.refresh(wave, |held| {
                    let levels = [self.reset.emitting(), self.set.emitting()];
                    if levels[0] && levels[1] {
                        held
                    } else {
                        levels[index]
                    }
                });
            }
        }
    }
}

/// An RS flip-flop built from two cross-coupled NOR gates.
///
/// `S` high sets `Q`, `R` high resets it, both low holds. Both high is
/// rejected: the change that caused it fails and is rolled back by its
/// source, leaving `Q`/`QBar` at their last stable levels.
///
/// # Examples
///
/// ```
/// use relaykit_core::Emitter;
/// use relaykit_latch::RsFlipFlop;
/// use relaykit_wire::{Board, Switch};
///
/// let board = Board::default();
/// let r = Switch::new(&board, false);
/// let s = Switch::new(&board, false);
/// let ff = RsFlipFlop::new(&board, &r, &s).unwrap();
/// assert!(!ff.emitting());
///
/// s.turn_on().unwrap();
/// s.turn_off().unwrap();
/// assert!(ff.emitting());
///
/// r.turn_on().unwrap();
/// assert!(!ff.emitting());
/// assert!(s.turn_on().is_err());
/// assert!(!ff.emitting());
/// ```
pub struct RsFlipFlop {
    id: ComponentId,
    q: NorGate,
    q_bar: NorGate,
    feedback: Junction,
}

impl RsFlipFlop {
    /// Wire a flip-flop on `reset` and `set`.
    ///
    /// Fails with [`CircuitError::InvalidInput`], before any wiring, if
    /// both are already high.
    pub fn new(board: &Board, reset: &dyn Pin, set: &dyn Pin) -> Result<Self, CircuitError> {
        Self::labeled(board, "rs", reset, set)
    }

    /// Like [`new`](RsFlipFlop::new), with a diagnostic label.
    pub fn labeled(
        board: &Board,
        label: &str,
        reset: &dyn Pin,
        set: &dyn Pin,
    ) -> Result<Self, CircuitError> {
        let id = ComponentId::next();
        let (r, s) = (reset.emitting(), set.emitting());
        if r && s {
            return Err(CircuitError::InvalidInput {
                component: id,
                label: label.to_owned(),
                wave: None,
                reason: BOTH_ASSERTED.to_owned(),
            });
        }
        let reset_in = Driver::new(board, format!("{label}.r"), r);
        let set_in = Driver::new(board, format!("{label}.s"), s);
        let guard = Arc::new(Guard {
            id,
            label: label.to_owned(),
            board: board.clone(),
            reset: reset.publisher().clone(),
            set: set.publisher().clone(),
            reset_in: reset_in.downgrade(),
            set_in: set_in.downgrade(),
            check: Mutex::new(()),
        });
        reset_in.retain(Arc::clone(&guard));
        set_in.retain(Arc::clone(&guard));

        let feedback = Junction::new(board, format!("{label}.fb"), false);
        let (set_line, reset_line) = (set_in.publisher(), reset_in.publisher());
        let q_bar = NorGate::labeled(board, &format!("{label}.qbar"), &[&set_line, &feedback])?;
        let q = NorGate::labeled(board, &format!("{label}.q"), &[&reset_line, &q_bar])?;
        feedback.attach(&q)?;

        for input in [reset, set] {
            let weak = Arc::downgrade(&guard);
            input.publisher().subscribe(move |signal| match weak.upgrade() {
                Some(guard) => {
                    guard.evaluate(signal.wave());
                    Delivery::Delivered
                }
                None => Delivery::Detached,
            })?;
        }

        tracing::debug!(
            target: "relaykit::latch",
            component = %id,
            label,
            q = q.emitting(),
            "flip-flop wired"
        );
        Ok(Self {
            id,
            q,
            q_bar,
            feedback,
        })
    }

    /// Identity used in [`CircuitError::InvalidInput`] reports.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The `Q` output.
    pub fn q(&self) -> &Publisher {
        self.q.publisher()
    }

    /// The `QBar` output.
    pub fn q_bar(&self) -> &Publisher {
        self.q_bar.publisher()
    }

    /// Whether the feedback edge is connected. Always true once built.
    pub fn is_closed(&self) -> bool {
        self.feedback.is_attached()
    }
}

impl Emitter for RsFlipFlop {
    fn emitting(&self) -> bool {
        self.q.emitting()
    }
}

impl Pin for RsFlipFlop {
    fn publisher(&self) -> &Publisher {
        self.q()
    }
}

impl fmt::Display for RsFlipFlop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Q={} QBar={}",
            u8::from(self.q.emitting()),
            u8::from(self.q_bar.emitting())
        )
    }
}

impl fmt::Debug for RsFlipFlop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsFlipFlop")
            .field("id", &self.id)
            .field("q", &self.q.emitting())
            .field("q_bar", &self.q_bar.emitting())
            .finish()
    }
}
