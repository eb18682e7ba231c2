use criterion::{black_box, criterion_group, criterion_main, Criterion};
use train_conf::models::{PathStep, PathStepLocation, PowerRestrictionRange};
use train_conf::path_steps::insert_ordered;
use train_conf::power_restrictions::upsert;

fn located_step(id: &str, position: u64) -> PathStep {
    PathStep::new(id, PathStepLocation::operational_point(id)).with_position(position)
}

fn benchmark_path_steps(c: &mut Criterion) {
    // A long itinerary with a restriction between every pair of steps
    let steps: Vec<PathStep> = (0..200).map(|i| located_step(&format!("s{i}"), i * 1_000)).collect();
    let restrictions: Vec<PowerRestrictionRange> = steps
        .windows(2)
        .map(|pair| PowerRestrictionRange::new(&pair[0].id, &pair[1].id, "C1US"))
        .collect();
    let new_step = located_step("new", 99_500);

    c.bench_function("insert_ordered", |b| {
        b.iter(|| insert_ordered(black_box(&steps), black_box(&new_step)));
    });

    c.bench_function("upsert", |b| {
        b.iter(|| {
            upsert(
                black_box(&steps),
                black_box(&restrictions),
                black_box(&steps[50]),
                black_box(&steps[120]),
                "M1US",
            )
        });
    });
}

criterion_group!(benches, benchmark_path_steps);
criterion_main!(benches);
