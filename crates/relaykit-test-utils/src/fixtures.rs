//! Reusable circuit fixtures.
//!
//! - [`FaultInjector`]: rejects every wave that raises a pin.
//! - [`echo`]: re-drives a publisher's own level back into itself.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use relaykit_core::{CircuitError, ComponentId};
use relaykit_wire::{Delivery, Driver, Pin};

/// Raises a fault in any wave that delivers `true` on the watched pin.
///
/// Useful for exercising rollback: a switch wired to a `FaultInjector`
/// can never be turned on.
pub struct FaultInjector {
    pub id: ComponentId,
    raised: Arc<AtomicUsize>,
}

impl FaultInjector {
    pub fn watch(pin: &dyn Pin) -> Self {
        let id = ComponentId::next();
        let raised = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&raised);
        // A pin that is already high faults its hot-wire wave; that is
        // the caller's mistake, so surface it loudly.
        pin.publisher()
            .subscribe(move |signal| {
                if signal.value() {
                    counter.fetch_add(1, Ordering::SeqCst);
                    signal.wave().raise(id, Self::error());
                }
                Delivery::Delivered
            })
            .expect("FaultInjector attached to a high pin");
        Self { id, raised }
    }

    /// The fault every rejected wave carries.
    pub fn error() -> CircuitError {
        CircuitError::EmptyGate { gate: "INJECTED" }
    }

    /// How many waves were rejected.
    pub fn raised(&self) -> usize {
        self.raised.load(Ordering::SeqCst)
    }
}

/// Subscribes to `driver`'s own publisher and re-drives the delivered
/// level within the same wave, producing a feedback echo.
pub fn echo(driver: &Driver) {
    let publisher = driver.publisher();
    let weak = driver.downgrade();
    publisher
        .subscribe(move |signal| match weak.upgrade() {
            Some(d) => {
                d.drive(signal.value(), signal.wave());
                Delivery::Delivered
            }
            None => Delivery::Detached,
        })
        .expect("echo subscription faulted");
}
