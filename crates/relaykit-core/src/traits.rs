//! Pull-side capability shared by every component.

/// Something that can report its current boolean level on demand.
///
/// Reading is side-effect free: it never starts a wave and never blocks
/// on a broadcast in progress. Implemented by sources, relays, gates,
/// adders and latches alike, so inspection code stays polymorphic.
pub trait Emitter {
    /// The component's present output level.
    fn emitting(&self) -> bool;
}

impl Emitter for bool {
    fn emitting(&self) -> bool {
        *self
    }
}

impl<T: Emitter + ?Sized> Emitter for &T {
    fn emitting(&self) -> bool {
        (**self).emitting()
    }
}

impl<T: Emitter + ?Sized> Emitter for Box<T> {
    fn emitting(&self) -> bool {
        (**self).emitting()
    }
}

/// Render a sequence of emitters as a `'0'`/`'1'` string, in the order given.
pub fn render_bits<E: Emitter>(bits: impl IntoIterator<Item = E>) -> String {
    bits.into_iter()
        .map(|b| if b.emitting() { '1' } else { '0' })
        .collect()
}
