//! Gesture lock and reset-pose state machine.
//!
//! While unlocked, the first stable gesture locks the controller and selects
//! its effect. While locked, gestures are ignored and only the reset pose is
//! tracked: a frontal, still, spread open palm held for a minimum number of
//! consecutive frames and a minimum duration. Any frame that breaks the pose
//! restarts the hold from zero.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::{
    classifier::{is_palm_shape, GestureClass},
    config::LockConfig,
    constants::DEFAULT_PALM_MARGIN,
    effects::EffectId,
    geometry::{finger_spread, palm_frontality},
    landmarks::LandmarkFrame,
    movement_detector::MovementDetector,
};

/// Effect selected by each gesture
#[must_use]
pub const fn effect_for_gesture(gesture: GestureClass) -> Option<EffectId> {
    match gesture {
        GestureClass::Pinch => Some(EffectId::FLOWER),
        GestureClass::Point => Some(EffectId::TRAIL),
        GestureClass::Palm => Some(EffectId::RINGS),
        GestureClass::None => None,
    }
}

/// State change reported by [`LockController::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTransition {
    /// A gesture was locked and its effect should become active
    Locked { gesture: GestureClass, effect: EffectId },
    /// The lock was cleared and the default effect should become active
    Unlocked { effect: EffectId },
}

impl LockTransition {
    /// Effect to select
    #[must_use]
    pub const fn effect(&self) -> EffectId {
        match *self {
            Self::Locked { effect, .. } | Self::Unlocked { effect } => effect,
        }
    }
}

/// Outcome of checking one frame against the reset pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCheck {
    Qualifies,
    /// A fingertip or the thumb tip is not above the wrist
    NotPalmShape,
    /// Palm is turned away from the camera
    NotFrontal,
    /// Wrist is moving or the position buffer is not yet full
    WristMoving,
    /// Fingertips are too close together
    FingersTogether,
}

impl std::fmt::Display for ResetCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Qualifies => "qualifies",
            Self::NotPalmShape => "fingers or thumb not above wrist",
            Self::NotFrontal => "palm not frontal",
            Self::WristMoving => "wrist not stable",
            Self::FingersTogether => "fingers not spread",
        })
    }
}

/// Lock bookkeeping, cleared on every unlock
#[derive(Debug, Clone)]
pub struct LockState {
    locked: Option<GestureClass>,
    reset_hold_start: Option<Instant>,
    reset_stability_count: u32,
    wrist: MovementDetector,
}

impl LockState {
    fn new(config: &LockConfig) -> Self {
        Self {
            locked: None,
            reset_hold_start: None,
            reset_stability_count: 0,
            wrist: MovementDetector::new(config.wrist_buffer_size, config.movement_threshold),
        }
    }

    fn clear_hold(&mut self) {
        self.reset_hold_start = None;
        self.reset_stability_count = 0;
    }

    #[must_use]
    pub const fn locked(&self) -> Option<GestureClass> {
        self.locked
    }

    /// When the current reset hold began
    #[must_use]
    pub const fn reset_hold_start(&self) -> Option<Instant> {
        self.reset_hold_start
    }

    /// Consecutive qualifying reset frames
    #[must_use]
    pub const fn reset_stability_count(&self) -> u32 {
        self.reset_stability_count
    }

    /// Buffered wrist positions
    #[must_use]
    pub fn wrist_samples(&self) -> usize {
        self.wrist.len()
    }
}

/// Snapshot for hosts that display lock progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockStatus {
    pub is_locked: bool,
    pub locked_gesture: Option<GestureClass>,
    /// A reset hold is in progress
    pub is_in_reset: bool,
    /// Elapsed hold over the required duration, in `[0, 1]`
    pub reset_progress: f64,
}

/// Gesture lock state machine
#[derive(Debug, Clone)]
pub struct LockController {
    config: LockConfig,
    palm_margin: f64,
    state: LockState,
    last_emitted: Option<GestureClass>,
}

impl Default for LockController {
    fn default() -> Self {
        Self::new(LockConfig::default(), DEFAULT_PALM_MARGIN)
    }
}

impl LockController {
    /// Create a lock controller.
    ///
    /// `palm_margin` is the height every tip must clear above the wrist for
    /// the reset pose's palm-shape test.
    ///
    /// # Panics
    ///
    /// Panics if `reset_stability_frames` or `wrist_buffer_size` is zero
    #[must_use]
    pub fn new(config: LockConfig, palm_margin: f64) -> Self {
        assert!(
            config.reset_stability_frames > 0,
            "Reset stability frames must be greater than 0"
        );
        assert!(config.wrist_buffer_size > 0, "Wrist buffer size must be greater than 0");

        let state = LockState::new(&config);
        Self {
            config,
            palm_margin,
            state,
            last_emitted: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LockConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &LockState {
        &self.state
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.state.locked.is_some()
    }

    /// New gestures can currently lock the controller.
    ///
    /// When this is false the classifier result is ignored.
    #[must_use]
    pub const fn accepts_gestures(&self) -> bool {
        !self.is_locked()
    }

    /// Advance the state machine by one frame.
    ///
    /// `stable` is the stability filter output for this frame and is only
    /// consulted while gestures are accepted. Invalid frames are ignored.
    pub fn step(&mut self, frame: &LandmarkFrame, stable: GestureClass, now: Instant) -> Option<LockTransition> {
        if !frame.is_valid() {
            return None;
        }
        if let Some(wrist) = frame.wrist() {
            self.state.wrist.push(wrist);
        }

        if self.is_locked() {
            return self.track_reset(frame, now);
        }

        if stable.is_none() || self.last_emitted == Some(stable) {
            return None;
        }
        let effect = effect_for_gesture(stable)?;

        self.state.locked = Some(stable);
        self.last_emitted = Some(stable);
        info!(
            "Gesture {} locked, effect {} ({}); hold an open palm to unlock",
            stable,
            effect,
            effect.label()
        );
        Some(LockTransition::Locked { gesture: stable, effect })
    }

    /// Evaluate the reset pose on one valid frame
    #[must_use]
    pub fn check_reset_pose(&self, frame: &LandmarkFrame) -> ResetCheck {
        if !is_palm_shape(frame, self.palm_margin) {
            return ResetCheck::NotPalmShape;
        }
        if palm_frontality(frame) < self.config.palm_frontality_threshold {
            return ResetCheck::NotFrontal;
        }
        if finger_spread(frame) <= self.config.min_finger_spread {
            return ResetCheck::FingersTogether;
        }
        if !self.state.wrist.is_still() {
            return ResetCheck::WristMoving;
        }
        ResetCheck::Qualifies
    }

    fn track_reset(&mut self, frame: &LandmarkFrame, now: Instant) -> Option<LockTransition> {
        let check = self.check_reset_pose(frame);
        if check != ResetCheck::Qualifies {
            if self.state.reset_stability_count > 0 {
                debug!(
                    "Reset hold interrupted after {} frames: {}",
                    self.state.reset_stability_count, check
                );
            }
            self.state.clear_hold();
            return None;
        }

        self.state.reset_stability_count = self.state.reset_stability_count.saturating_add(1);
        let start = *self.state.reset_hold_start.get_or_insert(now);
        let held = now.saturating_duration_since(start);
        debug!(
            "Reset pose frame {}/{}, held {} ms",
            self.state.reset_stability_count,
            self.config.reset_stability_frames,
            held.as_millis()
        );

        if self.state.reset_stability_count >= self.config.reset_stability_frames
            && held >= self.config.reset_hold()
        {
            info!("Reset pose held for {} ms, gestures unlocked", held.as_millis());
            return Some(self.unlock());
        }
        None
    }

    /// Clear the lock immediately and revert to the default effect
    pub fn force_unlock(&mut self) -> LockTransition {
        info!("Forced unlock");
        self.unlock()
    }

    fn unlock(&mut self) -> LockTransition {
        self.state = LockState::new(&self.config);
        self.last_emitted = None;
        LockTransition::Unlocked {
            effect: EffectId::DEFAULT,
        }
    }

    /// Lock and reset-hold progress at `now`
    #[must_use]
    pub fn status(&self, now: Instant) -> LockStatus {
        let hold = self.config.reset_hold();
        let reset_progress = match self.state.reset_hold_start {
            Some(_) if hold.is_zero() => 1.0,
            Some(start) => {
                (now.saturating_duration_since(start).as_secs_f64() / hold.as_secs_f64()).min(1.0)
            }
            None => 0.0,
        };

        LockStatus {
            is_locked: self.is_locked(),
            locked_gesture: self.state.locked,
            is_in_reset: self.state.reset_hold_start.is_some(),
            reset_progress,
        }
    }

    /// Time the reset pose must still be held at `now`, if a hold is running
    #[must_use]
    pub fn remaining_hold(&self, now: Instant) -> Option<Duration> {
        self.state
            .reset_hold_start
            .map(|start| self.config.reset_hold().saturating_sub(now.saturating_duration_since(start)))
    }
}
