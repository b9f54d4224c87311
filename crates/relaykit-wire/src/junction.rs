//! Deferred pins for feedback wiring.
//!
//! A component that consumes its own eventual output cannot be wired in
//! one pass: the output does not exist yet when the input network is
//! built. A [`Junction`] stands in for that input with a fixed initial
//! level; once the first settling pass has produced the real output,
//! [`attach`](Junction::attach) closes the loop.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use relaykit_core::{CircuitError, Emitter, SubscriptionId, Wave};

use crate::board::Board;
use crate::pin::Pin;
use crate::publisher::{Delivery, Driver, Publisher, WeakDriver};

struct Attachment {
    source: Publisher,
    subscription: Option<SubscriptionId>,
}

struct JunctionCore {
    driver: WeakDriver,
    attachment: Mutex<Option<Attachment>>,
}

impl JunctionCore {
    fn attachment(&self) -> MutexGuard<'_, Option<Attachment>> {
        self.attachment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn forward(&self, wave: &Wave) {
        if let Some(driver) = self.driver.upgrade() {
            driver.refresh(wave, |held| {
                self.attachment()
                    .as_ref()
                    .map_or(held, |a| a.source.emitting())
            });
        }
    }
}

/// A pin whose source is connected after construction.
///
/// Until attached it holds its initial level. While attached it mirrors
/// its source. The feedback edge lives as long as the `Junction` value:
/// dropping it detaches the source, which breaks the reference cycle a
/// feedback loop otherwise forms.
pub struct Junction {
    core: Arc<JunctionCore>,
    output: Publisher,
}

impl Junction {
    /// A detached junction holding `initial`.
    pub fn new(board: &Board, label: impl Into<String>, initial: bool) -> Self {
        let driver = Driver::new(board, label, initial);
        let core = Arc::new(JunctionCore {
            driver: driver.downgrade(),
            attachment: Mutex::new(None),
        });
        driver.retain(Arc::clone(&core));
        Self {
            core,
            output: driver.publisher(),
        }
    }

    /// Connect `source`, replacing any previous one.
    ///
    /// The source's present level is forwarded immediately and the
    /// resulting wave settles before this returns.
    pub fn attach(&self, source: &dyn Pin) -> Result<(), CircuitError> {
        self.detach();
        *self.core.attachment() = Some(Attachment {
            source: source.publisher().clone(),
            subscription: None,
        });

        let weak = Arc::downgrade(&self.core);
        let subscribed = source.publisher().subscribe(move |signal| match weak.upgrade() {
            Some(core) => {
                core.forward(signal.wave());
                Delivery::Delivered
            }
            None => Delivery::Detached,
        });
        match subscribed {
            Ok(id) => {
                if let Some(a) = self.core.attachment().as_mut() {
                    a.subscription = Some(id);
                }
                Ok(())
            }
            Err(err) => {
                self.core.attachment().take();
                Err(err)
            }
        }
    }

    /// Disconnect the current source, if any. The junction keeps the
    /// level it last mirrored.
    pub fn detach(&self) {
        let previous = self.core.attachment().take();
        if let Some(Attachment {
            source,
            subscription: Some(id),
        }) = previous
        {
            source.unsubscribe(id);
        }
    }

    /// Whether a source is connected.
    pub fn is_attached(&self) -> bool {
        self.core.attachment().is_some()
    }
}

impl Drop for Junction {
    fn drop(&mut self) {
        self.detach();
    }
}

impl Emitter for Junction {
    fn emitting(&self) -> bool {
        self.output.emitting()
    }
}

impl Pin for Junction {
    fn publisher(&self) -> &Publisher {
        &self.output
    }
}

impl fmt::Debug for Junction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Junction")
            .field("level", &self.output.emitting())
            .field("attached", &self.is_attached())
            .finish()
    }
}
