//! End-to-end benchmarks for the gesture pipeline and effect switching

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use gesture_effects::{
    app::{demo_session, GestureApp},
    config::Config,
    effects::{EffectId, EffectManager, EffectModule},
    pipeline::GesturePipeline,
    state::StateStore,
    synthetic,
};
use std::time::{Duration, Instant};

struct Noop;

impl EffectModule<()> for Noop {
    fn name(&self) -> &str {
        "noop"
    }
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = Config::default();

    // Steady locked state, the common case while an effect is showing
    group.bench_function("on_frame_locked", |b| {
        let store = StateStore::new();
        let mut pipeline = match GesturePipeline::new(&config, store) {
            Ok(pipeline) => pipeline,
            Err(e) => panic!("pipeline: {}", e),
        };
        let start = Instant::now();
        for i in 0..10 {
            pipeline.on_frame(synthetic::pinch(), start + Duration::from_millis(i * 33));
        }
        let mut tick = 10;
        b.iter(|| {
            tick += 1;
            black_box(pipeline.on_frame(
                synthetic::side_pinch(),
                start + Duration::from_millis(tick * 33),
            ))
        });
    });

    // Unlocked pipeline classifying every frame
    group.bench_function("on_frame_unlocked", |b| {
        b.iter_batched(
            || match GesturePipeline::new(&config, StateStore::new()) {
                Ok(pipeline) => pipeline,
                Err(e) => panic!("pipeline: {}", e),
            },
            |mut pipeline| {
                let start = Instant::now();
                for i in 0..4 {
                    black_box(pipeline.on_frame(
                        synthetic::closed_palm(),
                        start + Duration::from_millis(i * 33),
                    ));
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_demo_session(c: &mut Criterion) {
    let frames = demo_session();
    let config = Config::default();

    c.bench_function("replay_demo_session", |b| {
        b.iter_batched(
            || match GestureApp::new(&config) {
                Ok(app) => app,
                Err(e) => panic!("app: {}", e),
            },
            |mut app| {
                let summary = app.run(black_box(&frames), false);
                app.shutdown();
                summary
            },
            BatchSize::SmallInput,
        );
    });
}

fn benchmark_effect_switching(c: &mut Criterion) {
    let store = StateStore::new();
    let mut manager = EffectManager::new();
    for id in [EffectId::RINGS, EffectId::FLOWER, EffectId::TRAIL] {
        if let Err(e) = manager.register(id, Noop) {
            panic!("register: {}", e);
        }
    }
    if let Err(e) = manager.init((), &store) {
        panic!("init: {}", e);
    }

    let ids = [EffectId::FLOWER, EffectId::TRAIL, EffectId::RINGS];
    let mut next = 0;
    c.bench_function("store_set_effect_switch", |b| {
        b.iter(|| {
            next = (next + 1) % ids.len();
            store.set_effect(black_box(Some(ids[next])));
        });
    });

    c.bench_function("store_set_landmarks", |b| {
        let frame = synthetic::open_palm();
        b.iter(|| store.set_landmarks(black_box(frame.clone())));
    });

    drop(manager);
}

criterion_group!(
    benches,
    benchmark_pipeline,
    benchmark_demo_session,
    benchmark_effect_switching
);
criterion_main!(benches);
