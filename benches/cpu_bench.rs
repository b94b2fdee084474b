// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! CPU interpreter throughput benchmark
//!
//! Runs a tight arithmetic loop out of a synthetic BIOS so the numbers
//! track the fetch/decode/execute path without I/O noise.

use criterion::{criterion_group, criterion_main, Criterion};
use psemu::core::system::System;

/// A synthetic BIOS: a counting loop at the reset vector
fn synthetic_bios() -> Vec<u8> {
    let mut bios = vec![0u8; 512 * 1024];
    let program: [u32; 4] = [
        0x2401_0001, // ADDIU r1, r0, 1
        0x0041_1021, // ADDU r2, r2, r1
        0x0800_0000 | ((0xBFC0_0000u32 & 0x0FFF_FFFF) >> 2), // J reset vector
        0x0000_0000, // NOP (delay slot)
    ];
    for (i, word) in program.iter().enumerate() {
        bios[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    bios
}

fn bench_cpu_loop(c: &mut Criterion) {
    c.bench_function("cpu_10k_steps", |b| {
        let mut system = System::new();
        system.load_bios_bytes(&synthetic_bios()).unwrap();
        b.iter(|| {
            for _ in 0..10_000 {
                system.step().unwrap();
            }
        });
    });
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    group.sample_size(10);
    group.bench_function("one_frame", |b| {
        let mut system = System::new();
        system.load_bios_bytes(&synthetic_bios()).unwrap();
        b.iter(|| system.run_frame().unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_cpu_loop, bench_frame);
criterion_main!(benches);
