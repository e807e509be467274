use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

use crnt::{Complex, Reaction, ReactionNetwork, SvdRank, DEFAULT_RANK_TOLERANCE};

const CHAIN_LENGTH: usize = 100_000;
const RANDOM_SPECIES: usize = 2_000;
const RANDOM_REACTIONS: usize = 6_000;
/// The stoichiometric matrix of the deficiency benchmark is decomposed densely, so it is kept small.
const SMALL_SPECIES: usize = 200;
const SMALL_REACTIONS: usize = 600;
/// A fixed seed, so every run benchmarks the same network.
const SEED: u64 = 0x123456789abcdef;

fn species_complex(idx: usize) -> Complex {
    Complex::from_ids([(format!("X{idx}").as_str(), 1.)]).unwrap()
}

/// The network X0 -> X1 -> ... -> Xn.
fn chain_network(length: usize) -> ReactionNetwork {
    (1..length)
        .map(|idx| {
            Reaction::simple(
                format!("R{idx}"),
                species_complex(idx - 1),
                species_complex(idx),
            )
            .unwrap()
        })
        .collect()
}

fn random_network(species: usize, reactions: usize) -> ReactionNetwork {
    let rng = &mut StdRng::seed_from_u64(SEED);
    (0..reactions)
        .map(|idx| {
            Reaction::simple(
                format!("R{idx}"),
                species_complex(rng.random_range(0..species)),
                species_complex(rng.random_range(0..species)),
            )
            .unwrap()
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let chain = chain_network(CHAIN_LENGTH);
    c.bench_function("chain linkage classes", |b| {
        b.iter(|| {
            let network = black_box(chain.clone());
            network.linkage_classes().unwrap().len()
        })
    });

    let random = random_network(RANDOM_SPECIES, RANDOM_REACTIONS);
    c.bench_function("random strong linkage classes", |b| {
        b.iter(|| {
            let network = black_box(random.clone());
            network.strong_linkage_classes().unwrap().len()
        })
    });

    let small = random_network(SMALL_SPECIES, SMALL_REACTIONS);
    c.bench_function("random deficiency", |b| {
        b.iter(|| {
            let network = black_box(small.clone());
            network
                .deficiency(&SvdRank::new(DEFAULT_RANK_TOLERANCE))
                .unwrap()
        })
    });
}

criterion_group! {
    name=benches; config=Criterion::default().sample_size(10); targets=criterion_benchmark
}
criterion_main!(benches);
