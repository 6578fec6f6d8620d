use chessclock::{format_remaining, AlertPolicy, ClockEngine, GameConfig, ManualClock, Player};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn tick_throughput(c: &mut Criterion) {
    c.bench_function("engine_tick_running", |b| {
        let mut engine = ClockEngine::start(GameConfig::from_millis(u64::MAX / 2, 0))
            .with_clock(ManualClock::new());
        engine.end_turn_at(Player::Top, 0);
        let mut now = 0u64;
        b.iter(|| {
            now += 16;
            black_box(engine.tick(black_box(now)));
        })
    });

    c.bench_function("engine_tick_paused", |b| {
        let mut engine = ClockEngine::start(GameConfig::from_millis(300_000, 3_000))
            .with_clock(ManualClock::new());
        engine.end_turn_at(Player::Top, 0);
        engine.set_paused_at(true, 0);
        let mut now = 0u64;
        b.iter(|| {
            now += 16;
            black_box(engine.tick(black_box(now)));
        })
    });
}

fn move_throughput(c: &mut Criterion) {
    c.bench_function("engine_end_turn", |b| {
        let mut engine = ClockEngine::start(GameConfig::from_millis(300_000, 3_000))
            .with_clock(ManualClock::new());
        let mut now = 0u64;
        let mut mover = Player::Top;
        b.iter(|| {
            now += 1;
            black_box(engine.end_turn_at(mover, now));
            mover = mover.opponent();
        })
    });
}

fn alert_evaluation(c: &mut Criterion) {
    let policy = AlertPolicy::default();
    c.bench_function("alert_policy_final_seconds", |b| {
        b.iter(|| {
            let mut old = 6_010u64;
            while old > 0 {
                let new = old.saturating_sub(16);
                black_box(policy.evaluate(black_box(old), new));
                old = new;
            }
        })
    });
}

fn formatting(c: &mut Criterion) {
    c.bench_function("format_remaining_minutes", |b| {
        b.iter(|| black_box(format_remaining(black_box(1_234_567))))
    });
    c.bench_function("format_remaining_hundredths", |b| {
        b.iter(|| black_box(format_remaining(black_box(12_345))))
    });
}

criterion_group!(benches, tick_throughput, move_throughput, alert_evaluation, formatting);
criterion_main!(benches);
