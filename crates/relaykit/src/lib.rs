//! Relaykit: a relay-level digital logic simulator.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! relaykit sub-crates. Every component, from a single relay up to a 16-bit
//! adder, is wired from relays, and every mutation returns only after the
//! whole circuit has settled.
//!
//! # Quick start
//!
//! ```rust
//! use relaykit::prelude::*;
//!
//! let board = Board::default();
//! let adder = RippleAdder::parse(&board, 8, "10011101", "11010110", false).unwrap();
//! assert_eq!(adder.render(), "101110011");
//!
//! // Latch the sum, then change an operand: the latch holds.
//! let sum = adder.sum();
//! let pins: Vec<&dyn Pin> = sum.iter().map(|&p| p as &dyn Pin).collect();
//! let clock = Switch::new(&board, true);
//! let bank = LatchBank::new(&board, &pins, &clock, None).unwrap();
//! clock.turn_off().unwrap();
//!
//! let (a, _) = adder.operands().unwrap();
//! a.assign("00000001").unwrap();
//! assert_eq!(bank.render(), "01110011");
//! assert_eq!(adder.sum_bits(), "11010111");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `relaykit-core` | IDs, waves, errors, `Emitter`, the `Observer` seam |
//! | [`wire`] | `relaykit-wire` | Publishers, boards, sources, relays, junctions |
//! | [`gates`] | `relaykit-gates` | AND, OR, NAND, NOR, XOR, XNOR, NOT |
//! | [`arith`] | `relaykit-arith` | Buses, half/full adders, ripple adder and subtractor |
//! | [`latch`] | `relaykit-latch` | RS flip-flop, D latch, latch bank |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`relaykit-core`).
///
/// Contains [`types::Wave`] and its fault ledger, the error enums, and
/// the [`types::Observer`] seam with its [`types::TracingObserver`].
pub use relaykit_core as types;

/// The propagation substrate (`relaykit-wire`).
pub use relaykit_wire as wire;

/// Logic gates assembled from relays (`relaykit-gates`).
pub use relaykit_gates as gates;

/// Arithmetic composites (`relaykit-arith`).
///
/// [`arith::RippleAdder::parse`] and [`arith::RippleSubtractor::parse`]
/// validate their bit-strings before wiring anything.
pub use relaykit_arith as arith;

/// Sequential circuits (`relaykit-latch`).
pub use relaykit_latch as latch;

/// Common imports for typical relaykit usage.
///
/// ```rust
/// use relaykit::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use relaykit_core::{Emitter, Observer, Settled, WaveReport, WireEvent};

    // Errors
    pub use relaykit_core::{BusError, CircuitError};
    pub use relaykit_wire::ConfigError;

    // Wire
    pub use relaykit_wire::{
        Battery, Board, BoardConfig, FanOut, Junction, Oscillator, OscillatorConfig, Pin,
        Publisher, Relay, Switch,
    };

    // Gates
    pub use relaykit_gates::{
        AndGate, Gate, GateKind, Inverter, NandGate, NorGate, OrGate, XnorGate, XorGate,
    };

    // Arithmetic
    pub use relaykit_arith::{Bus, FullAdder, HalfAdder, RippleAdder, RippleSubtractor};

    // Latches
    pub use relaykit_latch::{DLatch, LatchBank, RsFlipFlop};
}
