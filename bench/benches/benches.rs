use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use landscape::{
    FractalNoise, GenerationParameters, Parameter, RegenerationScheduler, TerrainMesh,
    TerrainMeshBuilder, TerrainPalette,
};

const SEED: u64 = 2025;

fn params(resolution: u32) -> GenerationParameters {
    GenerationParameters {
        resolution,
        seed: SEED,
        ..Default::default()
    }
}

fn bench_fractal_sample(c: &mut Criterion) {
    let noise: FractalNoise = FractalNoise::default();
    let p = params(256);
    c.bench_function("FractalNoise sample (4 octaves)", |b| {
        b.iter(|| noise.sample(black_box(0.37), black_box(0.81), &p))
    });
}

fn bench_build(c: &mut Criterion) {
    let builder = TerrainMeshBuilder::new(TerrainPalette::default());
    let mut group = c.benchmark_group("TerrainMeshBuilder build_into");
    for resolution in [32u32, 128, 256] {
        let p = params(resolution);
        let mut mesh = TerrainMesh::default();
        group.bench_with_input(BenchmarkId::from_parameter(resolution), &p, |b, p| {
            b.iter(|| builder.build_into(p, &mut mesh).unwrap())
        });
    }
    group.finish();
}

fn bench_build_filtered(c: &mut Criterion) {
    let builder = TerrainMeshBuilder::new(TerrainPalette::default());
    let p = GenerationParameters {
        filter_enabled: true,
        sharpness: 5.0,
        ..params(128)
    };
    let mut mesh = TerrainMesh::default();
    c.bench_function("build_into 128 + buttes filter", |b| {
        b.iter(|| builder.build_into(&p, &mut mesh).unwrap())
    });
}

// One slider change followed by the tick that picks it up
fn bench_slider_rebuild(c: &mut Criterion) {
    let mut scheduler = RegenerationScheduler::new(params(128), TerrainPalette::default()).unwrap();
    scheduler.tick().unwrap();
    let mut shift = 0.0;
    c.bench_function("set shiftX + tick (128)", |b| {
        b.iter(|| {
            shift += 0.01;
            scheduler.set_parameter(Parameter::ShiftX, shift).unwrap();
            scheduler.tick().unwrap()
        })
    });
}

criterion_group!(
    terrain_benchmarks,
    bench_fractal_sample,
    bench_build,
    bench_build_filtered,
    bench_slider_rebuild
);
criterion_main!(terrain_benchmarks);
