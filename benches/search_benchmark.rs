use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use fitness_tracker::db::{MemoryStore, RecordStore};
use fitness_tracker::models::{ActivityType, Training, User};
use std::hint::black_box;

const USERS: u64 = 2_000;
const TRAININGS_PER_USER: u64 = 5;

fn benchmark_store_scans(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime");

    // Populate one store up front; the scans below don't mutate it
    let store = MemoryStore::new();
    let birthdate = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date");
    let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    runtime.block_on(async {
        for n in 0..USERS {
            let domain = if n % 10 == 0 { "rare.org" } else { "example.com" };
            let user = store
                .save_user(User::new(
                    "Bench",
                    &format!("User{}", n),
                    birthdate,
                    &format!("user{}@{}", n, domain),
                ))
                .await
                .expect("Failed to save user");
            let user_id = user.id.expect("id assigned");

            for k in 0..TRAININGS_PER_USER {
                let start = epoch + Duration::hours((n * TRAININGS_PER_USER + k) as i64);
                store
                    .save_training(Training::new(
                        user_id,
                        start,
                        start + Duration::minutes(45),
                        ActivityType::ALL[(k % 5) as usize],
                        8.0,
                        10.7,
                    ))
                    .await
                    .expect("Failed to save training");
            }
        }
    });

    let midpoint = epoch + Duration::hours((USERS * TRAININGS_PER_USER / 2) as i64);

    let mut group = c.benchmark_group("memory_store_scans");

    group.bench_function("email_fragment_rare", |b| {
        b.iter(|| runtime.block_on(store.find_user_emails_containing(black_box("rare.org"))))
    });

    group.bench_function("trainings_ending_after_midpoint", |b| {
        b.iter(|| runtime.block_on(store.find_trainings_ending_after(black_box(midpoint))))
    });

    group.bench_function("trainings_by_activity", |b| {
        b.iter(|| {
            runtime.block_on(store.find_trainings_by_activity(black_box(ActivityType::Swimming)))
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_store_scans);
criterion_main!(benches);
