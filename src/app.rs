//! Main application module: wires the store, pipeline and effects together
//! and replays timed landmark recordings through them.

use crate::{
    config::Config,
    effects::{EffectId, EffectManager, EffectModule},
    landmarks::LandmarkFrame,
    pipeline::{CycleReport, GesturePipeline},
    state::{AppState, StateStore, Subscription},
    synthetic, Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// In-memory stand-in for a rendering engine's root container
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Rc<RefCell<Vec<String>>>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, node: &str) {
        self.nodes.borrow_mut().push(node.to_string());
    }

    /// Remove every node named `node`
    pub fn detach(&self, node: &str) {
        self.nodes.borrow_mut().retain(|n| n != node);
    }

    #[must_use]
    pub fn nodes(&self) -> Vec<String> {
        self.nodes.borrow().clone()
    }

    #[must_use]
    pub fn contains(&self, node: &str) -> bool {
        self.nodes.borrow().iter().any(|n| n == node)
    }
}

/// Effect that attaches a single named node and logs what it would draw
#[derive(Debug)]
pub struct LoggingEffect {
    name: String,
    updates: u64,
}

impl LoggingEffect {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            updates: 0,
        }
    }

    /// Updates received since the last `init`
    #[must_use]
    pub const fn updates(&self) -> u64 {
        self.updates
    }
}

impl EffectModule<SceneGraph> for LoggingEffect {
    fn init(&mut self, scene: &SceneGraph) {
        self.updates = 0;
        scene.attach(&self.name);
    }

    fn update(&mut self, state: &AppState) {
        self.updates += 1;
        if let Some(wrist) = state.landmarks.as_ref().and_then(LandmarkFrame::wrist) {
            debug!("{} drawing around ({:.3}, {:.3})", self.name, wrist.x, wrist.y);
        }
    }

    fn dispose(&mut self, scene: &SceneGraph) {
        scene.detach(&self.name);
        debug!("{} disposed after {} updates", self.name, self.updates);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// One recorded detection cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedFrame {
    /// Milliseconds since the start of the recording
    pub t_ms: u64,
    /// Detected hand, `None` when no hand was found
    #[serde(default)]
    pub landmarks: Option<LandmarkFrame>,
}

impl TimedFrame {
    #[must_use]
    pub const fn new(t_ms: u64, landmarks: Option<LandmarkFrame>) -> Self {
        Self { t_ms, landmarks }
    }
}

/// Parse a YAML landmark recording
pub fn parse_recording(content: &str) -> Result<Vec<TimedFrame>> {
    serde_yaml::from_str(content).map_err(|e| Error::RecordingError(format!("Failed to parse recording: {e}")))
}

/// Load a YAML landmark recording from disk
pub fn load_recording<P: AsRef<Path>>(path: P) -> Result<Vec<TimedFrame>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;
    parse_recording(&content)
}

/// Scripted session visiting every effect: point, an ignored palm while
/// locked, a held reset, then a side-on pinch.
///
/// The reset hold completes on the 47th open palm frame; the palm is released
/// one frame later, before it can fill the stability window and relock.
#[must_use]
pub fn demo_session() -> Vec<TimedFrame> {
    const FRAME_MS: u64 = 33;

    let segments: [(Option<LandmarkFrame>, usize); 5] = [
        (None, 10),
        (Some(synthetic::point()), 20),
        (Some(synthetic::closed_palm()), 30),
        (Some(synthetic::open_palm()), 48),
        (Some(synthetic::side_pinch()), 20),
    ];

    segments
        .iter()
        .flat_map(|(frame, count)| std::iter::repeat(frame.clone()).take(*count))
        .enumerate()
        .map(|(i, landmarks)| TimedFrame::new(i as u64 * FRAME_MS, landmarks))
        .collect()
}

/// Totals from one replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles replayed
    pub frames: usize,
    /// Cycles without a hand
    pub no_hand: usize,
    /// Frames rejected as invalid
    pub dropped: usize,
    /// Effect selections in order, with the time they happened
    pub effect_changes: Vec<(u64, Option<EffectId>)>,
    pub final_effect: Option<EffectId>,
}

/// Main application struct
pub struct GestureApp {
    store: StateStore,
    pipeline: GesturePipeline,
    effects: EffectManager<SceneGraph>,
    scene: SceneGraph,
    changes: Rc<RefCell<Vec<Option<EffectId>>>>,
    label_subscription: Subscription,
}

impl GestureApp {
    /// Create the application with the built-in logging effects
    pub fn new(config: &Config) -> Result<Self> {
        let effects: Vec<(EffectId, Box<dyn EffectModule<SceneGraph>>)> = vec![
            (EffectId::RINGS, Box::new(LoggingEffect::new("rings"))),
            (EffectId::FLOWER, Box::new(LoggingEffect::new("flower"))),
            (EffectId::TRAIL, Box::new(LoggingEffect::new("trail"))),
        ];
        Self::with_effects(config, effects)
    }

    /// Create the application with a custom effect set
    pub fn with_effects(
        config: &Config,
        modules: Vec<(EffectId, Box<dyn EffectModule<SceneGraph>>)>,
    ) -> Result<Self> {
        info!("Initializing gesture effects application");

        let store = StateStore::new();
        let pipeline = GesturePipeline::new(config, store.clone())?;

        let mut effects = EffectManager::new();
        for (id, module) in modules {
            effects.register_boxed(id, module)?;
        }
        let scene = SceneGraph::new();
        effects.init(scene.clone(), &store)?;

        let changes = Rc::new(RefCell::new(Vec::new()));
        let last_seen = Cell::new(store.active_effect());
        let recorded = Rc::clone(&changes);
        let label_subscription = store.subscribe(move |state| {
            if state.active_effect == last_seen.get() {
                return;
            }
            last_seen.set(state.active_effect);
            recorded.borrow_mut().push(state.active_effect);
            match state.active_effect {
                Some(id) => info!("Effect changed: {} ({})", id, id.label()),
                None => info!("Effect changed: none"),
            }
        });

        Ok(Self {
            store,
            pipeline,
            effects,
            scene,
            changes,
            label_subscription,
        })
    }

    /// Handle one detection callback
    pub fn process(&mut self, landmarks: Option<LandmarkFrame>, now: Instant) -> Option<CycleReport> {
        match landmarks {
            Some(frame) => self.pipeline.on_frame(frame, now),
            None => {
                debug!("No hand detected");
                None
            }
        }
    }

    /// Select an effect directly, bypassing gestures
    pub fn change_effect(&self, id: EffectId) {
        info!("Effect {} requested directly", id);
        self.store.set_effect(Some(id));
    }

    /// Clear the gesture lock and revert to the default effect
    pub fn force_unlock(&mut self) {
        self.pipeline.force_unlock();
    }

    /// Replay a recording.
    ///
    /// With `realtime` the replay sleeps to honor the recorded timestamps;
    /// otherwise frames are processed back to back with synthetic time.
    pub fn run(&mut self, frames: &[TimedFrame], realtime: bool) -> RunSummary {
        info!("Replaying {} frames", frames.len());

        let start = Instant::now();
        let dropped_before = self.pipeline.dropped_frames();
        let mut summary = RunSummary::default();
        let mut last_t = 0;

        for timed in frames {
            // Timestamps must not run backwards
            let t_ms = if timed.t_ms < last_t {
                warn!("Timestamp {} ms precedes {} ms, clamping", timed.t_ms, last_t);
                last_t
            } else {
                timed.t_ms
            };
            last_t = t_ms;

            let now = start + Duration::from_millis(t_ms);
            if realtime {
                let wait = now.saturating_duration_since(Instant::now());
                if !wait.is_zero() {
                    std::thread::sleep(wait);
                }
            }

            let changes_before = self.changes.borrow().len();
            if timed.landmarks.is_none() {
                summary.no_hand += 1;
            }
            self.process(timed.landmarks.clone(), now);
            summary.frames += 1;

            let changes = self.changes.borrow();
            summary
                .effect_changes
                .extend(changes[changes_before..].iter().map(|&id| (t_ms, id)));
        }

        summary.dropped = usize::try_from(self.pipeline.dropped_frames() - dropped_before).unwrap_or(usize::MAX);
        summary.final_effect = self.effects.active_effect();
        info!(
            "Replay finished: {} frames, {} without a hand, {} dropped, {} effect changes",
            summary.frames,
            summary.no_hand,
            summary.dropped,
            summary.effect_changes.len()
        );
        summary
    }

    /// Dispose the live effect and detach from the store
    pub fn shutdown(&mut self) {
        self.label_subscription.unsubscribe();
        self.effects.shutdown();
        info!("Application shutting down");
    }

    #[must_use]
    pub const fn store(&self) -> &StateStore {
        &self.store
    }

    #[must_use]
    pub const fn pipeline(&self) -> &GesturePipeline {
        &self.pipeline
    }

    #[must_use]
    pub const fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Effect whose module is currently live
    #[must_use]
    pub fn active_effect(&self) -> Option<EffectId> {
        self.effects.active_effect()
    }
}
