//! OR and NOR: one battery-seeded relay per input, scanned as a whole.

use std::fmt;
use std::sync::Arc;

use relaykit_core::{CircuitError, Emitter, Wave};
use relaykit_wire::{Battery, Board, Delivery, Driver, Pin, Publisher, Relay, WeakDriver};
use smallvec::SmallVec;

use crate::gate::{describe, Gate, GateKind};

struct OrCore {
    contacts: SmallVec<[Publisher; 4]>,
    output: WeakDriver,
}

impl OrCore {
    /// Re-derive from every contact, not just the one that changed.
    fn rescan(&self, wave: &Wave) {
        if let Some(output) = self.output.upgrade() {
            output.refresh(wave, |_| self.contacts.iter().any(Publisher::emitting));
        }
    }
}

/// High when any input is high.
///
/// Each input energizes its own battery-fed relay. The output is
/// re-derived from all closed contacts whenever one of them changes.
pub struct OrGate {
    inputs: SmallVec<[Publisher; 4]>,
    relays: SmallVec<[Relay; 4]>,
    output: Publisher,
}

impl OrGate {
    /// Wire an OR over `pins`.
    ///
    /// Returns [`CircuitError::EmptyGate`] if `pins` is empty.
    pub fn new(board: &Board, pins: &[&dyn Pin]) -> Result<Self, CircuitError> {
        if pins.is_empty() {
            return Err(CircuitError::EmptyGate {
                gate: GateKind::Or.name(),
            });
        }
        let battery = Battery::new(board);
        let relays = pins
            .iter()
            .enumerate()
            .map(|(i, pin)| Relay::labeled(board, &format!("or.{i}"), Some(&battery), Some(*pin)))
            .collect::<Result<SmallVec<[Relay; 4]>, _>>()?;

        let driver = Driver::new(board, "or.out", false);
        let core = Arc::new(OrCore {
            contacts: relays.iter().map(|r| r.closed().clone()).collect(),
            output: driver.downgrade(),
        });
        driver.retain(Arc::clone(&core));
        let output = driver.publisher();

        for contact in &core.contacts {
            let weak = Arc::downgrade(&core);
            contact.subscribe(move |signal| match weak.upgrade() {
                Some(core) => {
                    core.rescan(signal.wave());
                    Delivery::Delivered
                }
                None => Delivery::Detached,
            })?;
        }

        Ok(Self {
            inputs: pins.iter().map(|p| p.publisher().clone()).collect(),
            relays,
            output,
        })
    }

    /// Number of relays (one per input).
    pub fn relay_count(&self) -> usize {
        self.relays.len()
    }
}

impl Emitter for OrGate {
    fn emitting(&self) -> bool {
        self.output.emitting()
    }
}

impl Pin for OrGate {
    fn publisher(&self) -> &Publisher {
        &self.output
    }
}

impl Gate for OrGate {
    fn kind(&self) -> GateKind {
        GateKind::Or
    }

    fn inputs(&self) -> &[Publisher] {
        &self.inputs
    }
}

impl fmt::Display for OrGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

impl fmt::Debug for OrGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrGate")
            .field("inputs", &self.inputs.len())
            .field("output", &self.output.emitting())
            .finish()
    }
}

/// High when no input is high.
pub struct NorGate {
    or: OrGate,
    output: Publisher,
}

impl NorGate {
    /// Wire a NOR over `pins`.
    pub fn new(board: &Board, pins: &[&dyn Pin]) -> Result<Self, CircuitError> {
        Self::labeled(board, "nor", pins)
    }

    /// Like [`new`](NorGate::new), labelling the output relay `label`.
    pub fn labeled(board: &Board, label: &str, pins: &[&dyn Pin]) -> Result<Self, CircuitError> {
        let or = OrGate::new(board, pins).map_err(|err| match err {
            CircuitError::EmptyGate { .. } => CircuitError::EmptyGate {
                gate: GateKind::Nor.name(),
            },
            other => other,
        })?;
        let battery = Battery::new(board);
        let negate = Relay::labeled(board, label, Some(&battery), Some(&or))?;
        Ok(Self {
            or,
            output: negate.open().clone(),
        })
    }
}

impl Emitter for NorGate {
    fn emitting(&self) -> bool {
        self.output.emitting()
    }
}

impl Pin for NorGate {
    fn publisher(&self) -> &Publisher {
        &self.output
    }
}

impl Gate for NorGate {
    fn kind(&self) -> GateKind {
        GateKind::Nor
    }

    fn inputs(&self) -> &[Publisher] {
        self.or.inputs()
    }
}

impl fmt::Display for NorGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

impl fmt::Debug for NorGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NorGate")
            .field("inputs", &self.or.inputs.len())
            .field("output", &self.output.emitting())
            .finish()
    }
}
