use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;
use rail_live_map::map::plan_changes;
use rail_live_map::models::TrainPosition;

#[allow(clippy::cast_precision_loss)]
fn fleet(count: usize, offset: f64) -> Vec<TrainPosition> {
    (0..count)
        .map(|i| TrainPosition {
            id: format!("rid_{i:06}"),
            lat: 50.0 + (i as f64) * 0.001 + offset,
            lng: -3.0 + (i as f64) * 0.001,
            delay: (i % 12) as f64,
            operator: "GW".to_string(),
            ..TrainPosition::default()
        })
        .collect()
}

fn benchmark_reconciliation(c: &mut Criterion) {
    // Roughly the size of a national live feed
    let previous = fleet(2_500, 0.0);
    let shown: IndexMap<String, TrainPosition> =
        previous.iter().map(|t| (t.id.clone(), t.clone())).collect();

    let unchanged = previous.clone();
    let moved = fleet(2_500, 0.01);
    let mut churned = fleet(2_000, 0.01);
    churned.extend(fleet(3_000, 0.0).into_iter().skip(2_500));

    c.bench_function("plan_changes_unchanged", |b| {
        b.iter(|| plan_changes(black_box(&shown), black_box(&unchanged)));
    });

    c.bench_function("plan_changes_all_moved", |b| {
        b.iter(|| plan_changes(black_box(&shown), black_box(&moved)));
    });

    c.bench_function("plan_changes_churn", |b| {
        b.iter(|| plan_changes(black_box(&shown), black_box(&churned)));
    });
}

criterion_group!(benches, benchmark_reconciliation);
criterion_main!(benches);
