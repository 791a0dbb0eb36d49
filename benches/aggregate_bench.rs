//! Benchmarks for the report aggregations
//!
//! Run with: cargo bench

use autodash::aggregate::{recession_report, yearly_report};
use autodash::chart::render_svg;
use autodash::dashboard::{chart_panel, SelectionState};
use autodash::dataset::{Dataset, Month, Record};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const VEHICLE_TYPES: [&str; 5] = [
    "Supperminicar",
    "Smallfamiliycar",
    "Mediumfamilycar",
    "Executivecar",
    "Sports",
];

/// One row per month and vehicle type, recessions every seventh year
fn create_test_dataset(years: i32) -> Dataset {
    let mut records = Vec::new();
    for year in 1980..1980 + years {
        for month in 1..=12u8 {
            for (i, vehicle_type) in VEHICLE_TYPES.iter().enumerate() {
                let seed = (year as f64) * 12.0 + month as f64 + i as f64;
                records.push(Record::new(
                    year,
                    Month::new(month).unwrap(),
                    year % 7 == 0,
                    *vehicle_type,
                    1000.0 + (seed * 37.0) % 3000.0,
                    1500.0 + (seed * 53.0) % 2000.0,
                    2.0 + (seed % 9.0),
                ));
            }
        }
    }
    Dataset::new(records)
}

fn bench_reports(c: &mut Criterion) {
    let mut group = c.benchmark_group("reports");

    for years in [10, 44] {
        let dataset = create_test_dataset(years);
        group.throughput(Throughput::Elements(dataset.len() as u64));

        group.bench_function(format!("recession_{}y", years), |b| {
            b.iter(|| recession_report(black_box(&dataset)))
        });

        group.bench_function(format!("yearly_{}y", years), |b| {
            b.iter(|| yearly_report(black_box(&dataset), black_box(1985)))
        });
    }

    group.finish();
}

fn bench_panel(c: &mut Criterion) {
    let mut group = c.benchmark_group("panel");
    let dataset = create_test_dataset(44);

    group.bench_function("recession_panel", |b| {
        let selection = SelectionState::recession();
        b.iter(|| chart_panel(black_box(&dataset), black_box(&selection)))
    });

    group.bench_function("yearly_panel_svg", |b| {
        let selection = SelectionState::yearly(1990);
        b.iter(|| {
            let panel = chart_panel(black_box(&dataset), black_box(&selection));
            panel.charts().map(render_svg).map(|svg| svg.len()).sum::<usize>()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_reports, bench_panel);
criterion_main!(benches);
