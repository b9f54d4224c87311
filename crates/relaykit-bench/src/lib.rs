//! Benchmark profiles and utilities for the relaykit logic simulator.
//!
//! Provides pre-built circuits for benchmarking and examples:
//!
//! - [`reference_adder`]: 16-bit ripple adder on bit-strings derived from a seed
//! - [`reference_register`]: 8-bit adder whose sum feeds a clocked latch bank
//! - [`operand_bits`]: deterministic operand strings via a simple hash of the seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use relaykit_arith::RippleAdder;
use relaykit_core::CircuitError;
use relaykit_latch::LatchBank;
use relaykit_wire::{Board, Pin, Switch};

/// Width of the reference adder.
pub const REFERENCE_WIDTH: usize = 16;

/// Generate a deterministic `width`-bit operand string, most significant
/// bit first.
pub fn operand_bits(width: usize, seed: u64) -> String {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..width)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            if state >> 63 == 1 {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}

/// Build the reference profile: a 16-bit ripple adder on `board`.
pub fn reference_adder(board: &Board, seed: u64) -> Result<RippleAdder, CircuitError> {
    RippleAdder::parse(
        board,
        REFERENCE_WIDTH,
        &operand_bits(REFERENCE_WIDTH, seed),
        &operand_bits(REFERENCE_WIDTH, seed.wrapping_add(1)),
        false,
    )
}

/// An 8-bit adder, a latch bank over its sum, and the bank's clock.
pub struct Register {
    /// The adder whose sum is stored.
    pub adder: RippleAdder,
    /// The clock gating the bank; starts low.
    pub clock: Switch,
    /// Eight latches over the adder's sum bits.
    pub bank: LatchBank,
}

/// Build the register profile on `board`.
pub fn reference_register(board: &Board, seed: u64) -> Result<Register, CircuitError> {
    let adder = RippleAdder::parse(board, 8, &operand_bits(8, seed), &operand_bits(8, !seed), false)?;
    let clock = Switch::labeled(board, "clock", false);
    let bank = {
        let sum = adder.sum();
        let pins: Vec<&dyn Pin> = sum.iter().map(|&p| p as &dyn Pin).collect();
        LatchBank::new(board, &pins, &clock, None)?
    };
    Ok(Register { adder, clock, bank })
}
