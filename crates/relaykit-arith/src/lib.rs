//! Arithmetic circuits built from relaykit gates.
//!
//! Provides bit-string input [`Bus`]es, one-bit [`HalfAdder`] and
//! [`FullAdder`], the width-parameterised [`RippleAdder`], and the
//! two's-complement [`RippleSubtractor`]. Bit-strings are written most
//! significant bit first and validated against `^[01]{N}$` before any
//! component is built.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adder;
pub mod bus;
pub mod ripple;
pub mod subtractor;

pub use adder::{FullAdder, HalfAdder};
pub use bus::{parse_bits, Bus};
pub use ripple::RippleAdder;
pub use subtractor::RippleSubtractor;
