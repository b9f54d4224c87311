//! Core types and traits for the relaykit logic simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the relaykit workspace:
//! identifiers, signals and waves, error types, the pull-side
//! [`Emitter`] trait, and the injectable [`Observer`] seam.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod observer;
pub mod signal;
pub mod traits;

pub use error::{BusError, CircuitError};
pub use id::{ComponentId, SubscriptionId, WaveId};
pub use observer::{NoopObserver, Observer, TracingObserver, WireEvent};
pub use signal::{Settled, Signal, Wave, WaveReport};
pub use traits::{render_bits, Emitter};
