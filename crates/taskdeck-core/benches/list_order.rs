#![allow(missing_docs)]

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use taskdeck_core::{NewTask, Priority, TaskStore, sort_for_list};
use time::{Date, Duration, Month, OffsetDateTime};

fn build_store(count: usize) -> TaskStore {
    let mut store = TaskStore::new();
    let base = OffsetDateTime::UNIX_EPOCH;
    let first = Date::from_calendar_date(2025, Month::January, 1).unwrap_or_else(|err| panic!("{err}"));
    for idx in 0..count {
        let mut draft = NewTask::titled(format!("task-{idx}"));
        draft.priority = Priority::ALL[idx % Priority::ALL.len()];
        let offset = i64::try_from(idx).unwrap_or_default();
        if idx % 2 == 0 {
            draft.due_date = first.checked_add(Duration::days(offset % 90));
        }
        let created = base + Duration::minutes(offset);
        let id = store.add_at(draft, created);
        if idx % 5 == 0
            && let Some(id) = id
        {
            store.toggle_completed_at(id, created);
        }
    }
    store
}

fn sort_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_for_list");
    for &count in &[16usize, 128, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || build_store(count),
                |store| {
                    black_box(sort_for_list(store.tasks()).len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, sort_benchmark);
criterion_main!(benches);
