use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weekly_budget::models::{BudgetPlan, Category, CategoryBudget, Transaction, WeekId};
use weekly_budget::notify::RecordingNotifier;
use weekly_budget::services::{
    ComparisonEngine, ForecastEngine, RolloverEngine, TransactionFilters, WeeklyAggregator,
};

fn build_transactions(count: usize) -> Vec<Transaction> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let categories = Category::all();

    (0..count)
        .map(|idx| {
            let date = start + Duration::days((idx % (3 * 365)) as i64);
            let category = categories[idx % categories.len()];
            let amount = if category == Category::Income {
                1500.0
            } else {
                -(10.0 + (idx % 90) as f64)
            };
            let mut txn = Transaction::new(
                format!("t{}", idx),
                date.format("%Y-%m-%d").to_string(),
                amount,
                category,
            );
            if idx % 7 == 0 {
                txn = txn.redeemable_at(0.5);
            }
            if idx % 11 == 0 {
                txn = txn.on_vacation();
            }
            txn
        })
        .collect()
}

fn build_plan() -> BudgetPlan {
    Category::all()
        .iter()
        .fold(BudgetPlan::new(), |plan, &category| {
            let budget = if category == Category::Income {
                CategoryBudget::new(3000.0, false)
            } else {
                CategoryBudget::new(-150.0, true)
            };
            plan.with_budget(category, budget)
        })
}

fn bench_engines(c: &mut Criterion) {
    let notifier = RecordingNotifier::new();
    let transactions = build_transactions(black_box(10_000));
    let filters = TransactionFilters::default();
    let plan = build_plan();

    c.bench_function("aggregate_3y_10k", |b| {
        b.iter(|| {
            let weekly = WeeklyAggregator::new(&notifier).aggregate(&transactions, &filters);
            black_box(weekly);
        })
    });

    let weekly = WeeklyAggregator::new(&notifier).aggregate(&transactions, &filters);
    let first: WeekId = "2022-W01".parse().unwrap();
    let target: WeekId = "2024-W52".parse().unwrap();

    c.bench_function("rollover_3y", |b| {
        b.iter(|| {
            let map = RolloverEngine::new(&notifier)
                .rollover(&weekly, &plan, &first, &target)
                .unwrap();
            black_box(map);
        })
    });

    c.bench_function("compare_week", |b| {
        b.iter(|| {
            let rows = ComparisonEngine::new(&notifier)
                .compare(&weekly, &plan, &target)
                .unwrap();
            black_box(rows);
        })
    });

    c.bench_function("forecast_12w", |b| {
        b.iter(|| {
            let prediction = ForecastEngine::new(&notifier)
                .predict(&plan, &weekly, 12)
                .unwrap();
            black_box(prediction);
        })
    });
}

criterion_group!(benches, bench_engines);
criterion_main!(benches);
