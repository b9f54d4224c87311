//! The single capability every wireable output exposes.

use relaykit_core::Emitter;

use crate::publisher::Publisher;

/// A subscribable boolean output.
///
/// Combines the pull side ([`Emitter::emitting`]) with the push side
/// (the underlying [`Publisher`]), so gate, adder and latch constructors
/// stay polymorphic over batteries, switches, relays' contacts, gates,
/// and bus bits.
pub trait Pin: Emitter + Send + Sync {
    /// The publisher carrying this pin's level.
    fn publisher(&self) -> &Publisher;
}

impl Pin for Publisher {
    fn publisher(&self) -> &Publisher {
        self
    }
}

impl<T: Pin + ?Sized> Pin for &T {
    fn publisher(&self) -> &Publisher {
        (**self).publisher()
    }
}
