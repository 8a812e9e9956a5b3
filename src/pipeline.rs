//! Per-cycle gesture control path.
//!
//! One call to [`GesturePipeline::on_frame`] runs a full detection cycle:
//! publish the frame to the store, classify, smooth, advance the lock, and
//! publish the selected effect if the lock changed state.

use std::time::Instant;

use log::{debug, info, warn};

use crate::{
    classifier::{GestureClass, GestureClassifier, GestureObservation},
    config::Config,
    filters::GestureFilter,
    landmarks::LandmarkFrame,
    lock::{LockController, LockStatus, LockTransition},
    state::StateStore,
    Result,
};

/// What happened during one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Raw classifier output, `None` when the classifier was bypassed
    pub observation: Option<GestureObservation>,
    /// Stability filter output
    pub stable: GestureClass,
    pub transition: Option<LockTransition>,
}

/// Classifier, stability filter and lock controller wired to a state store
pub struct GesturePipeline {
    classifier: GestureClassifier,
    filter: Box<dyn GestureFilter>,
    lock: LockController,
    store: StateStore,
    dropped_frames: u64,
}

impl GesturePipeline {
    /// Build a pipeline from a validated configuration
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: &Config, store: StateStore) -> Result<Self> {
        config.validate()?;
        let filter = config.create_filter()?;
        let classifier = GestureClassifier::new(config.classifier.clone());
        let lock = LockController::new(config.lock.clone(), config.classifier.palm_margin);
        Ok(Self::with_parts(classifier, filter, lock, store))
    }

    #[must_use]
    pub fn with_parts(
        classifier: GestureClassifier,
        filter: Box<dyn GestureFilter>,
        lock: LockController,
        store: StateStore,
    ) -> Self {
        info!("Gesture pipeline using {}", filter.name());
        Self {
            classifier,
            filter,
            lock,
            store,
            dropped_frames: 0,
        }
    }

    /// Run one detection cycle.
    ///
    /// Invalid frames are dropped without touching any state and yield `None`.
    pub fn on_frame(&mut self, frame: LandmarkFrame, now: Instant) -> Option<CycleReport> {
        if !frame.is_valid() {
            self.dropped_frames += 1;
            warn!("Dropping invalid frame with {} landmarks", frame.len());
            return None;
        }

        // Listeners see the frame before any gesture logic runs
        self.store.set_landmarks(frame.clone());

        let (observation, stable) = if self.lock.accepts_gestures() {
            let observation = self.classifier.classify(&frame);
            (Some(observation), self.filter.observe(observation))
        } else {
            (None, GestureClass::None)
        };

        let transition = self.lock.step(&frame, stable, now);
        if let Some(transition) = transition {
            self.apply(transition);
        }

        Some(CycleReport {
            observation,
            stable,
            transition,
        })
    }

    fn apply(&mut self, transition: LockTransition) {
        if let LockTransition::Unlocked { .. } = transition {
            self.filter.reset();
            debug!("Stability window cleared");
        }
        self.store.set_effect(Some(transition.effect()));
    }

    /// Lock and reset-hold progress at `now`
    #[must_use]
    pub fn lock_status(&self, now: Instant) -> LockStatus {
        self.lock.status(now)
    }

    /// Clear any lock and revert to the default effect
    pub fn force_unlock(&mut self) {
        let transition = self.lock.force_unlock();
        self.apply(transition);
    }

    #[must_use]
    pub const fn lock(&self) -> &LockController {
        &self.lock
    }

    #[must_use]
    pub const fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    #[must_use]
    pub const fn store(&self) -> &StateStore {
        &self.store
    }

    /// Frames rejected as invalid so far
    #[must_use]
    pub const fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }
}
