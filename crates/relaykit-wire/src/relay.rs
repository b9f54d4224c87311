//! The two-contact relay every gate is assembled from.

use std::fmt;
use std::sync::Arc;

use relaykit_core::{CircuitError, Wave};

use crate::board::Board;
use crate::pin::Pin;
use crate::publisher::{Delivery, Driver, Publisher, WeakDriver};

/// A relay with a feed input `a`, a coil input `b`, and two contacts.
///
/// - `open = a && !b`: the feed passes while the coil is unpowered.
/// - `closed = a && b`: the feed passes while the coil is powered.
///
/// An absent input is permanently unpowered. Both contacts are
/// re-derived on every input notification; each republishes only when
/// its own level changed.
pub struct Relay {
    open: Publisher,
    closed: Publisher,
}

struct RelayCore {
    a: Option<Publisher>,
    b: Option<Publisher>,
    open: WeakDriver,
    closed: WeakDriver,
}

impl RelayCore {
    fn inputs(&self) -> (bool, bool) {
        let level = |p: &Option<Publisher>| p.as_ref().is_some_and(Publisher::emitting);
        (level(&self.a), level(&self.b))
    }

    fn energize(&self, wave: &Wave) {
        if let Some(open) = self.open.upgrade() {
            open.refresh(wave, |_| {
                let (a, b) = self.inputs();
                a && !b
            });
        }
        if let Some(closed) = self.closed.upgrade() {
            closed.refresh(wave, |_| {
                let (a, b) = self.inputs();
                a && b
            });
        }
    }
}

impl Relay {
    /// Wire a relay to `a` (feed) and `b` (coil).
    ///
    /// Returns once both contacts reflect the inputs' present levels.
    pub fn new(board: &Board, a: Option<&dyn Pin>, b: Option<&dyn Pin>) -> Result<Self, CircuitError> {
        Self::labeled(board, "relay", a, b)
    }

    /// Like [`new`](Relay::new), with a diagnostic label prefix.
    pub fn labeled(
        board: &Board,
        label: &str,
        a: Option<&dyn Pin>,
        b: Option<&dyn Pin>,
    ) -> Result<Self, CircuitError> {
        let open = Driver::new(board, format!("{label}.open"), false);
        let closed = Driver::new(board, format!("{label}.closed"), false);
        let core = Arc::new(RelayCore {
            a: a.map(|p| p.publisher().clone()),
            b: b.map(|p| p.publisher().clone()),
            open: open.downgrade(),
            closed: closed.downgrade(),
        });
        open.retain(Arc::clone(&core));
        closed.retain(Arc::clone(&core));

        let relay = Self {
            open: open.publisher(),
            closed: closed.publisher(),
        };
        for input in [&core.a, &core.b].into_iter().flatten() {
            let weak = Arc::downgrade(&core);
            input.subscribe(move |signal| match weak.upgrade() {
                Some(core) => {
                    core.energize(signal.wave());
                    Delivery::Delivered
                }
                None => Delivery::Detached,
            })?;
        }
        Ok(relay)
    }

    /// The `a && !b` contact.
    pub fn open(&self) -> &Publisher {
        &self.open
    }

    /// The `a && b` contact.
    pub fn closed(&self) -> &Publisher {
        &self.closed
    }
}

impl fmt::Debug for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relay")
            .field("open", &self.open.emitting())
            .field("closed", &self.closed.emitting())
            .finish()
    }
}
