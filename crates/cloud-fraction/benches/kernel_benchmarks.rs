//! Benchmarks for the cloud fraction kernel and band reduction.
//!
//! Run with: cargo bench --package cloud-fraction --bench kernel_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cloud_fraction::{
    band_max, compute_cloud_fraction, CloudConstants, EmptyBandPolicy, Field3D, GridShape,
    MicrophysicsScheme, ModelFields, PressureBand,
};
use test_utils::{create_mixing_ratio_field, create_pressure_field, create_temperature_field};

/// Build a WRF-like snapshot with mixed clear and cloudy cells.
fn generate_fields(shape: GridShape) -> ModelFields {
    let len = shape.len();
    let pressure = create_pressure_field(shape.nz, shape.ny, shape.nx);
    let temperature = create_temperature_field(&pressure);
    let field = |data: Vec<f64>| Field3D::new(data, shape).unwrap();

    ModelFields {
        temperature: field(temperature),
        pressure: field(pressure),
        qvapor: field(create_mixing_ratio_field(len, 0.01, 1)),
        qcloud: field(create_mixing_ratio_field(len, 5e-4, 2)),
        qrain: field(create_mixing_ratio_field(len, 1e-4, 3)),
        qice: field(create_mixing_ratio_field(len, 2e-4, 4)),
        qsnow: field(create_mixing_ratio_field(len, 2e-4, 5)),
        ice_fraction: None,
    }
}

// Typical WRF domains: 40-60 levels, a few hundred points per side
const SHAPES: [(usize, usize, usize); 3] = [(40, 50, 50), (50, 150, 150), (60, 300, 300)];

fn bench_compute_cloud_fraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_cloud_fraction");
    group.sample_size(20);
    let constants = CloudConstants::default();

    for (nz, ny, nx) in SHAPES {
        let shape = GridShape::new(nz, ny, nx);
        let fields = generate_fields(shape);
        group.throughput(Throughput::Elements(shape.len() as u64));

        for scheme in [MicrophysicsScheme::Lin, MicrophysicsScheme::Wsm3] {
            group.bench_with_input(
                BenchmarkId::new(scheme.to_string(), format!("{}x{}x{}", nz, ny, nx)),
                &fields,
                |b, fields| {
                    b.iter(|| {
                        compute_cloud_fraction(black_box(scheme), black_box(fields), &constants)
                            .unwrap()
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_band_max(c: &mut Criterion) {
    let mut group = c.benchmark_group("band_max");
    let constants = CloudConstants::default();

    for (nz, ny, nx) in SHAPES {
        let shape = GridShape::new(nz, ny, nx);
        let fields = generate_fields(shape);
        let fraction =
            compute_cloud_fraction(MicrophysicsScheme::Lin, &fields, &constants).unwrap();
        let pressure_hpa = fields.pressure_hpa();
        group.throughput(Throughput::Elements(shape.columns() as u64));

        group.bench_function(BenchmarkId::from_parameter(format!("{}x{}x{}", nz, ny, nx)), |b| {
            b.iter(|| {
                band_max(
                    black_box(&fraction),
                    black_box(&pressure_hpa),
                    PressureBand::default(),
                    EmptyBandPolicy::Nan,
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_cloud_fraction, bench_band_max);
criterion_main!(benches);
