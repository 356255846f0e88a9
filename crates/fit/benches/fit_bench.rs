use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use fit::{Context, FitTable, Fixture, FixtureRegistry, IgnoringFixture, RunConfig, run_document};
use html::{Node, parse_fragment};

const SMALL_ROWS: usize = 16;
const LARGE_ROWS: usize = 5_000;

fn make_table(rows: usize) -> String {
    let mut out = String::with_capacity(rows * 64 + 64);
    out.push_str("<table><tr><td>fit.Fixture</td><td>size = large</td></tr>");
    for i in 0..rows {
        out.push_str(&format!(
            "<tr><td>{i}</td><td>value {i}</td><td><b>{}</b></td></tr>",
            i * 2
        ));
    }
    out.push_str("</table>");
    out
}

fn table_node(markup: &str) -> Node {
    parse_fragment(markup)
        .into_iter()
        .find(|n| n.is_element_named("table"))
        .unwrap_or_else(|| panic!("bench markup has no table"))
}

fn bench_parse_small(c: &mut Criterion) {
    let node = table_node(&make_table(SMALL_ROWS));
    c.bench_function("bench_parse_small", |b| {
        b.iter_batched(
            || node.clone(),
            |mut node| {
                let table = FitTable::new(&mut node).map(|t| t.rows().len());
                black_box(table.ok());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_parse_and_finish_large(c: &mut Criterion) {
    let node = table_node(&make_table(LARGE_ROWS));
    c.bench_function("bench_parse_and_finish_large", |b| {
        b.iter_batched(
            || node.clone(),
            |mut node| {
                if let Ok(mut table) = FitTable::new(&mut node) {
                    IgnoringFixture.do_table(&mut table);
                    black_box(table.finish());
                }
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_parse_and_finish_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_parse_and_finish_scaling");
    for rows in [1_250, 2_500, 5_000, 10_000] {
        let node = table_node(&make_table(rows));
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &node, |b, node| {
            b.iter_batched(
                || node.clone(),
                |mut node| {
                    if let Ok(mut table) = FitTable::new(&mut node) {
                        IgnoringFixture.do_table(&mut table);
                        black_box(table.finish());
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_run_document(c: &mut Criterion) {
    let page = format!("<html><body>{}{}</body></html>", make_table(500), make_table(500));
    let registry = FixtureRegistry::with_defaults();
    c.bench_function("bench_run_document", |b| {
        b.iter(|| {
            let mut context = Context::new();
            let report = run_document(
                black_box(&page),
                &registry,
                &mut context,
                &RunConfig::default(),
            );
            black_box(report.counts);
        });
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_and_finish_large,
    bench_parse_and_finish_scaling,
    bench_run_document
);
criterion_main!(benches);
