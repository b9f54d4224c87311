//! Logic gates assembled from relays.
//!
//! Every gate here is a fixed composition of [`Relay`](relaykit_wire::Relay)s
//! and other gates, never a primitive: AND is a battery-seeded relay
//! chain, OR a bank of battery-fed relays scanned together, NAND/NOR
//! their negated readings, XOR and XNOR compositions of those, and NOT a
//! single relay's open contact. All of them implement [`Gate`] and can
//! feed one another as [`Pin`](relaykit_wire::Pin)s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod and;
pub mod gate;
pub mod inverter;
pub mod or;
pub mod xor;

#[cfg(test)]
pub(crate) mod compliance;

pub use and::{AndGate, NandGate};
pub use gate::{Gate, GateKind};
pub use inverter::Inverter;
pub use or::{NorGate, OrGate};
pub use xor::{XnorGate, XorGate};
