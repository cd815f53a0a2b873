use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use gf2::BitMatrix;
use lowweight::expansion::sha1_expansion_code;
use lowweight::{CodeMatrix, LowWeightSearch, SearchParameters};
use rand::prelude::*;

struct Parameters((usize, usize, usize));

pub fn iteration_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("LowWeightSearch::canteaut_chabaud");
    for (dimension, length, enumeration_weight) in [(64usize, 192usize, 2usize), (256, 768, 1), (256, 768, 2)] {
        group.sample_size(10);
        let parameters = Parameters((dimension, length, enumeration_weight));
        group.bench_with_input(
            BenchmarkId::from_parameter(&parameters),
            &parameters,
            |bencher, parameters| {
                let (dimension, length, enumeration_weight) = parameters.0;
                let search = LowWeightSearch::new(
                    SearchParameters::default()
                        .with_iterations(1)
                        .with_threads(1)
                        .with_enumeration_weight(enumeration_weight),
                );
                bencher.iter_batched(
                    || random_code(dimension, length, &mut thread_rng()),
                    |code| search.canteaut_chabaud(&code),
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

pub fn shortening_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("CodeMatrix::code_shortening");
    group.sample_size(10);
    for words in [20usize, 40, 60] {
        let code = sha1_expansion_code(words).unwrap();
        let forced: Vec<usize> = (32 * (words - 1)..32 * words).collect();
        group.bench_with_input(BenchmarkId::from_parameter(words), &words, |bencher, _| {
            bencher.iter(|| code.code_shortening(&forced));
        });
    }
    group.finish();
}

fn random_code<R: Rng>(dimension: usize, length: usize, rng: &mut R) -> CodeMatrix {
    let mut matrix = BitMatrix::random_with_rng(dimension, length, rng);
    let rank = matrix.echelonize().len();
    let rows: Vec<usize> = (0..rank).collect();
    let mut permutation: Vec<usize> = (0..length).collect();
    permutation.shuffle(rng);
    CodeMatrix::new(matrix.select_rows(&rows).permuted_columns(&permutation)).unwrap()
}

impl std::fmt::Display for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (dimension, length, enumeration_weight) = self.0;
        write!(f, "(k={dimension}, n={length}, p={enumeration_weight})")?;
        Ok(())
    }
}

criterion_group!(benches, iteration_benchmark, shortening_benchmark);
criterion_main!(benches);
