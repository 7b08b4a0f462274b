use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use token_pulse::{
    logging,
    model::{Category, SortKey, SortSpec},
    simulator::{generate_tokens, perturb_tokens, Perturbation},
    view::derive_view,
};

fn bench_derive_view(c: &mut Criterion) {
    logging::set_silent(true);
    let collection_size: usize = 50_000;
    let mut rng = StdRng::seed_from_u64(0xBADF00D);
    let tokens = generate_tokens(collection_size, &mut rng, 1_716_400_000_000);

    let mut group = c.benchmark_group("view");
    group.throughput(Throughput::Elements(collection_size as u64));

    group.bench_function("derive_by_volume", |b| {
        b.iter(|| {
            derive_view(
                black_box(&tokens),
                Category::New,
                None,
                SortSpec::default(),
            )
        })
    });

    group.bench_function("derive_search_by_name", |b| {
        b.iter(|| {
            derive_view(
                black_box(&tokens),
                Category::Migrated,
                Some("pe"),
                SortSpec::ascending(SortKey::Name),
            )
        })
    });

    group.bench_function("perturb_tick", |b| {
        let step = Perturbation::default();
        b.iter(|| perturb_tokens(black_box(&tokens), &mut rng, 1_716_400_002_500, &step))
    });

    group.finish();
}

criterion_group!(benches, bench_derive_view);
criterion_main!(benches);
