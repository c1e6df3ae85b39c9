//! Criterion benchmarks for plan building.
//!
//! Synthetic tables of increasing size measure evaluation, ranking and
//! sectioning together, independent of workbook parsing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cxm::{build_plan, Directive, PlanRequest, ProfileTable, Workbook, WidgetRecord};

const ATTRIBUTES: [&str; 6] = ["EV", "TOU", "Solar", "BudgetBilling", "DemandCharge", "Regular"];
const SECTIONS: [&str; 6] = ["Overview", "Usage", "Billing", "Solar", "EV", "Programs"];

// ===========================================================================
// Synthetic tables
// ===========================================================================

fn synthetic_table(widgets: usize) -> ProfileTable {
    let records = (0..widgets)
        .map(|i| {
            let mut record = WidgetRecord::new(format!("Widget {}", i), SECTIONS[i % SECTIONS.len()]);
            for (j, attr) in ATTRIBUTES.iter().enumerate() {
                let directive = match (i + j) % 7 {
                    0 => Directive::Kill,
                    1 | 2 => Directive::Include,
                    3 | 4 => Directive::Rank(((i * 31 + j) % 9 + 1) as f64),
                    _ => Directive::Pass,
                };
                record = record.with_directive(*attr, directive);
            }
            record
        })
        .collect();
    ProfileTable::new("bench", records).unwrap_or_else(|e| panic!("bench table: {}", e))
}

fn bench_synthetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_plan_synthetic");
    let request = PlanRequest::default().select("EV").select("TOU").select("Regular");

    for widgets in [10usize, 100, 1000, 10_000] {
        let table = synthetic_table(widgets);
        group.bench_with_input(BenchmarkId::from_parameter(widgets), &table, |b, t| {
            b.iter(|| build_plan(black_box(t), black_box(&request)))
        });
    }
    group.finish();
}

// ===========================================================================
// Built-in workbook
// ===========================================================================

fn bench_builtin(c: &mut Criterion) {
    let table = Workbook::builtin()
        .and_then(|w| w.sheet("residential-electric-ami"))
        .unwrap_or_else(|e| panic!("built-in workbook: {}", e));
    let request = PlanRequest::default().select("TOU").select("Solar");

    c.bench_function("build_plan_builtin", |b| {
        b.iter(|| build_plan(black_box(&table), black_box(&request)))
    });
}

criterion_group!(benches, bench_synthetic, bench_builtin);
criterion_main!(benches);
