//! Adders and subtractors against integer arithmetic.

use proptest::prelude::*;
use relaykit_arith::{Bus, FullAdder, HalfAdder, RippleAdder, RippleSubtractor};
use relaykit_test_utils::{boards, Probe, RecordingObserver};
use relaykit_wire::{Board, Switch};

fn bits(value: u32, width: usize) -> String {
    format!("{value:0width$b}")
}

#[test]
fn documented_vectors_hold_on_every_board() {
    for (mode, board) in boards() {
        let eight = RippleAdder::parse(&board, 8, "10011101", "11010110", false).unwrap();
        assert_eq!(eight.render(), "101110011", "{mode}");

        let sixteen = RippleAdder::parse(
            &board,
            16,
            "1001110110011101",
            "1101011011010110",
            false,
        )
        .unwrap();
        assert_eq!(sixteen.render(), "10111010001110011", "{mode}");
    }
}

#[test]
fn one_bit_adders() {
    for (mode, board) in boards() {
        let one = Switch::new(&board, true);
        let half = HalfAdder::new(&board, &one, &one).unwrap();
        assert_eq!((half.sum().emitting(), half.carry().emitting()), (false, true), "{mode}");
        let full = FullAdder::new(&board, &one, &one, &one).unwrap();
        assert_eq!((full.sum().emitting(), full.carry().emitting()), (true, true), "{mode}");
    }
}

#[test]
fn adder_over_external_buses() {
    let board = Board::threaded();
    let a = Bus::parse(&board, "x", 4, "0011").unwrap();
    let b = Bus::parse(&board, "y", 4, "0101").unwrap();
    let carry = Switch::new(&board, false);
    let adder = RippleAdder::new(&board, &a.pins(), &b.pins(), &carry).unwrap();
    assert_eq!(adder.render(), "01000");
    assert!(adder.operands().is_none());

    let carry_probe = Probe::attach(adder.carry_out());
    a.assign("1111").unwrap();
    assert_eq!(adder.render(), "10100");
    assert_eq!(carry_probe.last(), Some(true));
}

#[test]
fn carry_ripples_in_one_wave() {
    let observer = RecordingObserver::new();
    let board = RecordingObserver::board(&observer);
    let adder = RippleAdder::parse(&board, 8, "11111111", "00000000", false).unwrap();
    let settled = adder.carry_in().unwrap().turn_on().unwrap();
    assert_eq!(adder.render(), "100000000");
    let report = settled.report().unwrap();
    assert!(report.transitions > 8, "every stage flips: {report:?}");
    assert!(observer.count("transition") as u64 >= report.transitions);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn adder_matches_integer_sum(
        width in 1usize..=10,
        x in any::<u32>(),
        y in any::<u32>(),
        carry_in in any::<bool>(),
        threaded in any::<bool>(),
    ) {
        let mask = (1u32 << width) - 1;
        let (x, y) = (x & mask, y & mask);
        let board = if threaded { Board::threaded() } else { Board::default() };
        let adder = RippleAdder::parse(&board, width, &bits(x, width), &bits(y, width), carry_in).unwrap();
        let expected = x + y + u32::from(carry_in);
        prop_assert_eq!(adder.render(), bits(expected, width + 1));
    }

    #[test]
    fn reassigned_operands_resettle(
        width in 1usize..=8,
        steps in prop::collection::vec((any::<u32>(), any::<u32>()), 1..6),
    ) {
        let mask = (1u32 << width) - 1;
        let board = Board::threaded();
        let adder = RippleAdder::parse(&board, width, &bits(0, width), &bits(0, width), false).unwrap();
        let (a, b) = adder.operands().unwrap();
        for (x, y) in steps {
            let (x, y) = (x & mask, y & mask);
            a.assign(&bits(x, width)).unwrap();
            b.assign(&bits(y, width)).unwrap();
            prop_assert_eq!(adder.render(), bits(x + y, width + 1));
        }
    }

    #[test]
    fn subtractor_matches_wrapping_difference(
        width in 1usize..=10,
        x in any::<u32>(),
        y in any::<u32>(),
    ) {
        let mask = (1u32 << width) - 1;
        let (x, y) = (x & mask, y & mask);
        let board = Board::default();
        let sub = RippleSubtractor::parse(&board, width, &bits(x, width), &bits(y, width)).unwrap();
        prop_assert_eq!(sub.difference_bits(), bits(x.wrapping_sub(y) & mask, width));
        prop_assert_eq!(sub.is_negative(), x < y);
    }
}
