use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eigenspace::datasets::{cycle, gene_network};
use eigenspace::spectral::{build_laplacian, eigen_decompose};
use eigenspace::{embed, CommunitySampler, SampleConfig};

fn bench_spectral_pipeline(c: &mut Criterion) {
    let communities = CommunitySampler::sample(&SampleConfig {
        seed: Some(42),
        ..SampleConfig::default()
    })
    .expect("community graph")
    .adjacency;
    let genes = gene_network();
    let ring = cycle(16);

    let mut group = c.benchmark_group("spectral_pipeline");

    group.bench_function("laplacian_24", |b| {
        b.iter(|| {
            let lap = build_laplacian(&communities).expect("laplacian");
            black_box(lap);
        });
    });

    group.bench_function("jacobi_8", |b| {
        let lap = build_laplacian(&genes).expect("laplacian");
        b.iter(|| black_box(eigen_decompose(&lap)));
    });

    group.bench_function("jacobi_16_cycle", |b| {
        let lap = build_laplacian(&ring).expect("laplacian");
        b.iter(|| black_box(eigen_decompose(&lap)));
    });

    group.bench_function("jacobi_24", |b| {
        let lap = build_laplacian(&communities).expect("laplacian");
        b.iter(|| black_box(eigen_decompose(&lap)));
    });

    group.bench_function("embed_24", |b| {
        b.iter(|| {
            let result = embed(&communities, 3, true).expect("embedding");
            black_box(result);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_spectral_pipeline);
criterion_main!(benches);
