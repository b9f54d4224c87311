//! Propagation substrate for relaykit circuits.
//!
//! Provides the [`Publisher`]/[`Driver`] pair every output is built on,
//! the primitive sources ([`Battery`], [`Switch`], [`Oscillator`]), the
//! two-contact [`Relay`], and the [`Junction`] used to close feedback
//! loops. Every mutation returns only after the circuit has settled.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod board;
pub mod config;
mod fanout;
pub mod junction;
pub mod oscillator;
pub mod pin;
pub mod publisher;
pub mod relay;
pub mod source;

pub use board::Board;
pub use config::{BoardConfig, ConfigError, FanOut, OscillatorConfig};
pub use junction::Junction;
pub use oscillator::{Oscillator, OscillatorHandle, OscillatorStats};
pub use pin::Pin;
pub use publisher::{Delivery, Driver, Publisher, WeakDriver};
pub use relay::Relay;
pub use source::{Battery, Switch};
