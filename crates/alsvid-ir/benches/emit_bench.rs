//! Benchmarks for gate emission and simulation.

use alsvid_ir::{simulate, Circuit};
use criterion::{criterion_group, criterion_main, Criterion};

fn build_adder_like(lines: u32, rounds: usize) -> Circuit {
    let mut circ = Circuit::new();
    circ.set_lines(lines);
    for _ in 0..rounds {
        for i in 0..lines - 2 {
            let _ = circ.append_toffoli(i, i + 1, i + 2);
            let _ = circ.append_cnot(i, i + 1);
        }
    }
    circ
}

fn bench_emission(c: &mut Criterion) {
    c.bench_function("emit_1k_gates", |b| {
        b.iter(|| build_adder_like(32, 17));
    });

    c.bench_function("emit_scoped_1k_gates", |b| {
        b.iter(|| {
            let mut circ = Circuit::new();
            circ.set_lines(32);
            circ.activate_scope();
            circ.register_control(0);
            circ.register_control(1);
            for _ in 0..17 {
                for i in 2..30 {
                    let _ = circ.append_toffoli(i, i + 1, i + 2);
                    let _ = circ.append_cnot(i, i + 1);
                }
            }
            circ.deactivate_scope();
            circ
        });
    });
}

fn bench_simulation(c: &mut Criterion) {
    let circ = build_adder_like(32, 17);
    let input = vec![true; 32];

    c.bench_function("simulate_1k_gates", |b| {
        b.iter(|| simulate(&circ, &input).unwrap());
    });
}

criterion_group!(benches, bench_emission, bench_simulation);
criterion_main!(benches);
