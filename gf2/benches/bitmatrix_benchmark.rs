use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use gf2::{BitMatrix, EchelonForm};
use rand::prelude::*;

struct Parameters((usize, usize));

pub fn echelonize_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitMatrix::echelonize");
    for (rows, columns) in [(64usize, 128usize), (256, 1024), (512, 1920)] {
        group.sample_size(10);
        let parameters = Parameters((rows, columns));
        group.bench_with_input(
            BenchmarkId::from_parameter(&parameters),
            &parameters,
            |bencher, parameters| {
                let (rows, columns) = parameters.0;
                bencher.iter_batched(
                    || BitMatrix::random_with_rng(rows, columns, &mut thread_rng()),
                    |mut matrix| matrix.echelonize(),
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

pub fn permute_columns_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitMatrix::permuted_columns");
    for (rows, columns) in [(64usize, 128usize), (256, 1024), (512, 1920)] {
        group.sample_size(10);
        let parameters = Parameters((rows, columns));
        group.bench_with_input(
            BenchmarkId::from_parameter(&parameters),
            &parameters,
            |bencher, parameters| {
                let (rows, columns) = parameters.0;
                bencher.iter_batched(
                    || {
                        let matrix = BitMatrix::random_with_rng(rows, columns, &mut thread_rng());
                        let mut permutation: Vec<usize> = (0..columns).collect();
                        permutation.shuffle(&mut thread_rng());
                        (matrix, permutation)
                    },
                    |(matrix, permutation)| matrix.permuted_columns(&permutation),
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

pub fn transpose_solve_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("EchelonForm::transpose_solve");
    for (rows, columns) in [(64usize, 128usize), (256, 1024)] {
        group.sample_size(10);
        let parameters = Parameters((rows, columns));
        group.bench_with_input(
            BenchmarkId::from_parameter(&parameters),
            &parameters,
            |bencher, parameters| {
                let (rows, columns) = parameters.0;
                bencher.iter_batched(
                    || {
                        let matrix = BitMatrix::random_with_rng(rows, columns, &mut thread_rng());
                        let target = matrix.row(0);
                        (EchelonForm::new(matrix), target)
                    },
                    |(echelon_form, target)| echelon_form.transpose_solve(&target),
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

impl std::fmt::Display for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (rows, columns) = self.0;
        write!(f, "(rows={rows}, columns={columns})")?;
        Ok(())
    }
}

criterion_group!(
    benches,
    echelonize_benchmark,
    permute_columns_benchmark,
    transpose_solve_benchmark,
);
criterion_main!(benches);
