//! Gate truth-table compliance helpers.
//!
//! Every gate is checked two ways on both fan-out strategies: built
//! fresh against each input row (construction must settle), and built
//! once then driven through every row (propagation must settle).

use relaykit_core::{CircuitError, Emitter};
use relaykit_wire::{Board, Pin, Switch};

use crate::gate::{Gate, GateKind};

fn boards() -> [(&'static str, Board); 2] {
    [("inline", Board::default()), ("threaded", Board::threaded())]
}

fn rows(width: usize) -> Vec<Vec<bool>> {
    (0..1u32 << width)
        .map(|n| (0..width).map(|i| n >> i & 1 == 1).collect())
        .collect()
}

/// Assert that the gate built by `build` over `width` switches computes
/// `kind` for every input row.
pub fn assert_truth_table<G, F>(width: usize, kind: GateKind, build: F)
where
    G: Gate,
    F: Fn(&Board, &[&dyn Pin]) -> Result<G, CircuitError>,
{
    for (mode, board) in boards() {
        for row in rows(width) {
            let switches: Vec<Switch> = row.iter().map(|&v| Switch::new(&board, v)).collect();
            let pins: Vec<&dyn Pin> = switches.iter().map(|s| s as &dyn Pin).collect();
            let gate = build(&board, &pins).unwrap();
            assert_eq!(gate.kind(), kind);
            assert_eq!(
                gate.emitting(),
                kind.eval(&row),
                "{mode}: {kind} constructed on {row:?}"
            );
        }

        let switches: Vec<Switch> = (0..width).map(|_| Switch::new(&board, false)).collect();
        let pins: Vec<&dyn Pin> = switches.iter().map(|s| s as &dyn Pin).collect();
        let gate = build(&board, &pins).unwrap();
        assert_eq!(gate.inputs().len(), width);
        for row in rows(width) {
            for (switch, &level) in switches.iter().zip(&row) {
                switch.set(level).unwrap();
            }
            assert_eq!(
                gate.emitting(),
                kind.eval(&row),
                "{mode}: {kind} driven to {row:?}"
            );
            assert_eq!(gate.output().emitting(), gate.emitting());
        }
    }
}
