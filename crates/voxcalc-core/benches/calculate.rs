use criterion::{black_box, criterion_group, criterion_main, Criterion};

use voxcalc_core::{calculate, evaluate, normalize};

const PHRASES: &[&str] = &[
    "two plus three times four",
    "what is twenty five squared plus sine of 30 degrees",
    "square root of one thousand two hundred and ninety six",
    "दो लाख गुणा दो जोड़ पांच",
];

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| {
            for phrase in PHRASES {
                black_box(normalize(black_box(phrase)));
            }
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let expression = "(Math.sin(0.5235987755982988)) * 4 + 5! - 2 ** 3 % 7";
    c.bench_function("evaluate", |b| b.iter(|| evaluate(black_box(expression))));
}

fn bench_calculate(c: &mut Criterion) {
    c.bench_function("calculate", |b| {
        b.iter(|| {
            for phrase in PHRASES {
                let _ = black_box(calculate(black_box(phrase)));
            }
        })
    });
}

criterion_group!(benches, bench_normalize, bench_evaluate, bench_calculate);
criterion_main!(benches);
