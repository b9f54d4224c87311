//! Sequential circuits for relaykit: flip-flops and latches.
//!
//! These are the only components whose wiring contains a cycle. The
//! cycle is closed after the first settling pass through a
//! [`Junction`](relaykit_wire::Junction), and every wave that crosses it
//! ends when a gate re-derives the level it already accepted in that
//! wave. Asserting both inputs of an [`RsFlipFlop`] is rejected and
//! rolled back rather than producing an undefined `Q`/`QBar` pair.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bank;
pub mod d_latch;
pub mod rs;

pub use bank::LatchBank;
pub use d_latch::DLatch;
pub use rs::RsFlipFlop;
