//! Criterion benchmarks for wave propagation through reference circuits.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use relaykit_arith::RippleAdder;
use relaykit_bench::{operand_bits, reference_adder, reference_register, REFERENCE_WIDTH};
use relaykit_core::Emitter;
use relaykit_gates::AndGate;
use relaykit_wire::{Battery, Board, Switch};

fn boards() -> [(&'static str, Board); 2] {
    [("inline", Board::default()), ("threaded", Board::threaded())]
}

fn bench_build_adder_16(c: &mut Criterion) {
    let board = Board::default();
    c.bench_function("build_adder_16", |b| {
        b.iter(|| {
            let adder = reference_adder(&board, 42).unwrap();
            black_box(adder.render());
        });
    });
}

fn bench_reassign_operand(c: &mut Criterion) {
    let mut group = c.benchmark_group("reassign_operand_16");
    for (mode, board) in boards() {
        let adder = reference_adder(&board, 42).unwrap();
        let (a, _) = adder.operands().unwrap();
        let patterns = [
            operand_bits(REFERENCE_WIDTH, 1),
            operand_bits(REFERENCE_WIDTH, 2),
        ];
        let mut next = 0;
        group.bench_function(BenchmarkId::from_parameter(mode), |b| {
            b.iter(|| {
                next ^= 1;
                let reports = a.assign(&patterns[next]).unwrap();
                black_box(reports);
            });
        });
    }
    group.finish();
}

fn bench_carry_ripple(c: &mut Criterion) {
    let board = Board::default();
    let adder = RippleAdder::parse(
        &board,
        REFERENCE_WIDTH,
        &"1".repeat(REFERENCE_WIDTH),
        &"0".repeat(REFERENCE_WIDTH),
        false,
    )
    .unwrap();
    let carry = adder.carry_in().unwrap();
    c.bench_function("carry_ripple_16", |b| {
        b.iter(|| {
            black_box(carry.toggle().unwrap());
        });
    });
}

fn bench_wide_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out_64");
    for (mode, board) in boards() {
        let input = Switch::new(&board, false);
        let battery = Battery::new(&board);
        let gates: Vec<AndGate> = (0..64)
            .map(|_| AndGate::new(&board, &[&input, &battery]).unwrap())
            .collect();
        group.bench_function(BenchmarkId::from_parameter(mode), |b| {
            b.iter(|| {
                input.toggle().unwrap();
                black_box(gates[0].emitting());
            });
        });
    }
    group.finish();
}

fn bench_latch_clock(c: &mut Criterion) {
    let board = Board::default();
    let register = reference_register(&board, 42).unwrap();
    c.bench_function("latch_bank_clock_8", |b| {
        b.iter(|| {
            register.clock.toggle().unwrap();
            black_box(register.bank.render());
        });
    });
}

criterion_group!(
    benches,
    bench_build_adder_16,
    bench_reassign_operand,
    bench_carry_ripple,
    bench_wide_fan_out,
    bench_latch_clock
);
criterion_main!(benches);
