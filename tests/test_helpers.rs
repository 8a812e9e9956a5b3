//! Helper functions and utilities for tests

#![allow(dead_code)]

use gesture_effects::{
    config::Config,
    effects::EffectModule,
    landmarks::{Landmark, LandmarkFrame},
    pipeline::GesturePipeline,
    state::{AppState, StateStore},
};
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Shared, ordered record of effect lifecycle calls
pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Effect module that records every lifecycle call
pub struct RecordingEffect {
    pub name: &'static str,
    pub log: CallLog,
}

impl RecordingEffect {
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: Rc::clone(log),
        }
    }
}

impl EffectModule<()> for RecordingEffect {
    fn init(&mut self, _scene: &()) {
        self.log.borrow_mut().push(format!("init:{}", self.name));
    }

    fn update(&mut self, _state: &AppState) {
        self.log.borrow_mut().push(format!("update:{}", self.name));
    }

    fn dispose(&mut self, _scene: &()) {
        self.log.borrow_mut().push(format!("dispose:{}", self.name));
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Drain the call log
pub fn take_calls(log: &CallLog) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

/// Pipeline with default configuration on a fresh store
pub fn default_pipeline() -> (GesturePipeline, StateStore) {
    let store = StateStore::new();
    let pipeline = GesturePipeline::new(&Config::default(), store.clone()).expect("default config is valid");
    (pipeline, store)
}

/// Feed `count` copies of `frame`, `step_ms` apart, starting one step after
/// `start`. Returns the time of the last frame.
pub fn feed(pipeline: &mut GesturePipeline, frame: &LandmarkFrame, count: usize, start: Instant, step_ms: u64) -> Instant {
    let mut now = start;
    for _ in 0..count {
        now += Duration::from_millis(step_ms);
        pipeline.on_frame(frame.clone(), now);
    }
    now
}

/// Copy of `frame` with every coordinate perturbed by up to `amplitude`
pub fn jittered<R: Rng>(frame: &LandmarkFrame, rng: &mut R, amplitude: f64) -> LandmarkFrame {
    LandmarkFrame::new(
        frame
            .points()
            .iter()
            .map(|p| {
                Landmark::new(
                    p.x + rng.gen_range(-amplitude..=amplitude),
                    p.y + rng.gen_range(-amplitude..=amplitude),
                    p.z,
                )
            })
            .collect(),
    )
}
