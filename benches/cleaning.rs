use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use data_sweeper::export::export;
use data_sweeper::format::{ExportFormat, TableFormat};
use data_sweeper::ingestion::load;
use data_sweeper::processing::{CleaningSpec, MissingValueStrategy, clean};
use data_sweeper::types::Table;

/// Synthetic sales CSV with duplicates every 10th row and gaps in two columns.
fn sales_csv(rows: usize) -> Vec<u8> {
    let mut out = String::from("order_id,region,units,price\n");
    for i in 0..rows {
        let id = if i % 10 == 9 { i - 1 } else { i };
        let region = ["north", "south", "east", "west"][id % 4];
        let units = if id % 7 == 0 { String::new() } else { (id % 50).to_string() };
        let price = if id % 11 == 0 { String::new() } else { format!("{}.25", id % 90) };
        out.push_str(&format!("{id},{region},{units},{price}\n"));
    }
    out.into_bytes()
}

fn sales_table(rows: usize) -> Table {
    load(&sales_csv(rows), TableFormat::Csv).unwrap()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_csv");
    for rows in [1_000usize, 50_000] {
        let bytes = sales_csv(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &bytes, |b, bytes| {
            b.iter(|| load(black_box(bytes), TableFormat::Csv).unwrap())
        });
    }
    group.finish();
}

fn bench_clean(c: &mut Criterion) {
    let table = sales_table(50_000);
    let mut group = c.benchmark_group("clean_50k");
    for strategy in [
        MissingValueStrategy::DropRows,
        MissingValueStrategy::FillZeroOrPlaceholder,
        MissingValueStrategy::ForwardFill,
        MissingValueStrategy::FillMean,
    ] {
        let spec = CleaningSpec {
            remove_duplicates: true,
            missing_value_strategy: strategy,
        };
        group.bench_with_input(BenchmarkId::from_parameter(strategy), &spec, |b, spec| {
            b.iter(|| clean(black_box(&table), spec))
        });
    }
    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let table = sales_table(50_000);
    c.bench_function("export_csv_50k", |b| {
        b.iter(|| export(black_box(&table), ExportFormat::Csv).unwrap())
    });
}

criterion_group!(benches, bench_load, bench_clean, bench_export);
criterion_main!(benches);
