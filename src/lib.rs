//! Hand gesture control core for selecting interactive visual effects.
//!
//! This library turns a stream of 21-joint hand landmark frames into effect
//! selections:
//! - A geometric classifier recognizing pinch, point and open palm
//! - A majority-vote stability filter suppressing single-frame flicker
//! - A lock controller that holds the selected effect until a deliberate
//!   reset pose (a still, frontal, spread open palm) is held
//! - A synchronous state store and an effect manager enforcing that at most
//!   one effect module is live
//!
//! # Examples
//!
//! ## Classifying a Frame
//!
//! ```
//! use gesture_effects::{classifier::{GestureClass, GestureClassifier}, synthetic};
//!
//! let classifier = GestureClassifier::default();
//! let observation = classifier.classify(&synthetic::pinch());
//! assert_eq!(observation.class, GestureClass::Pinch);
//! assert!(observation.confidence > 0.0);
//! ```
//!
//! ## Smoothing Observations
//!
//! ```
//! use gesture_effects::classifier::{GestureClass, GestureObservation};
//! use gesture_effects::filters::{create_filter, GestureFilter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut filter = create_filter("majority:5:0.6")?;
//!
//! let mut stable = GestureClass::None;
//! for class in [GestureClass::Pinch, GestureClass::Pinch, GestureClass::Point, GestureClass::Pinch, GestureClass::Pinch] {
//!     stable = filter.observe(GestureObservation::new(class, 1.0));
//! }
//! assert_eq!(stable, GestureClass::Pinch);
//! # Ok(())
//! # }
//! ```
//!
//! ## Complete Pipeline Example
//!
//! ```
//! use gesture_effects::{
//!     config::Config,
//!     effects::{EffectId, EffectManager, EffectModule},
//!     pipeline::GesturePipeline,
//!     state::{AppState, StateStore},
//!     synthetic,
//! };
//! use std::time::{Duration, Instant};
//!
//! struct Flower;
//!
//! impl EffectModule<()> for Flower {
//!     fn update(&mut self, state: &AppState) {
//!         assert!(state.landmarks.is_some());
//!     }
//!
//!     fn name(&self) -> &str {
//!         "flower"
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StateStore::new();
//! let mut effects = EffectManager::new();
//! effects.register(EffectId::FLOWER, Flower)?;
//! effects.init((), &store)?;
//!
//! let mut pipeline = GesturePipeline::new(&Config::default(), store.clone())?;
//! let start = Instant::now();
//! for i in 0..5 {
//!     pipeline.on_frame(synthetic::pinch(), start + Duration::from_millis(i * 33));
//! }
//!
//! assert_eq!(store.active_effect(), Some(EffectId::FLOWER));
//! assert_eq!(effects.active_effect(), Some(EffectId::FLOWER));
//! assert!(pipeline.lock_status(start).is_locked);
//! # Ok(())
//! # }
//! ```

/// Hand landmark frames and joint indices
pub mod landmarks;

/// Vector geometry on landmarks
pub mod geometry;

/// Per-frame gesture classification
pub mod classifier;

/// Stability filters for gesture observations
pub mod filters;

/// Wrist stillness detection
pub mod movement_detector;

/// Gesture lock and reset-pose state machine
pub mod lock;

/// Application state store with synchronous subscriptions
pub mod state;

/// Effect registry and lifecycle management
pub mod effects;

/// Per-cycle orchestration of classifier, filter and lock
pub mod pipeline;

/// Main application module
pub mod app;

/// Deterministic synthetic hand poses
pub mod synthetic;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
