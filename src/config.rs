//! Configuration management for the gesture effects pipeline

use crate::{
    constants::{
        DEFAULT_FINGER_EXTENSION_ANGLE, DEFAULT_MAJORITY_RATIO, DEFAULT_MIN_FINGER_SPREAD,
        DEFAULT_MOVEMENT_THRESHOLD, DEFAULT_PALM_FRONTALITY_THRESHOLD, DEFAULT_PALM_MARGIN,
        DEFAULT_PINCH_THRESHOLD, DEFAULT_POINT_MARGIN, DEFAULT_RESET_HOLD_MS,
        DEFAULT_RESET_STABILITY_FRAMES, DEFAULT_STABILITY_WINDOW, DEFAULT_WRIST_BUFFER_SIZE,
    },
    filters::GestureFilter,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gesture classifier configuration
    pub classifier: ClassifierConfig,

    /// Stability filter configuration
    pub stability: StabilityConfig,

    /// Lock and reset configuration
    pub lock: LockConfig,
}

/// How the classifier picks between several active gesture classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Pinch, then Point, then Palm; the first active class wins
    #[default]
    Priority,
    /// The active class with the highest confidence wins
    Confidence,
}

/// Gesture classifier thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Thumb-index tip distance below which a pinch is active
    pub pinch_threshold: f64,

    /// Interior PIP angle (radians) above which a finger is extended
    pub finger_extension_angle: f64,

    /// Height the index tip must clear above the wrist for a point
    pub point_margin: f64,

    /// Height every tip must clear above the wrist for a palm
    pub palm_margin: f64,

    /// Selection policy when several classes are active
    pub tie_break: TieBreak,

    /// Blend alignment and hand-size terms into the pinch confidence
    pub blend_pinch_confidence: bool,
}

/// Stability filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Filter type (`majority` or `none`)
    pub filter: String,

    /// Number of observations kept in the window
    pub window_size: usize,

    /// Fraction of the window the winning class must occupy
    pub majority_ratio: f64,
}

/// Lock controller and reset pose configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Minimum reset hold duration in milliseconds
    pub reset_hold_ms: u64,

    /// Consecutive qualifying frames required to reset
    pub reset_stability_frames: u32,

    /// Minimum palm frontality (0-1)
    pub palm_frontality_threshold: f64,

    /// Maximum wrist deviation from its rolling mean
    pub movement_threshold: f64,

    /// Minimum average adjacent-fingertip distance
    pub min_finger_spread: f64,

    /// Wrist position buffer length
    pub wrist_buffer_size: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            finger_extension_angle: DEFAULT_FINGER_EXTENSION_ANGLE,
            point_margin: DEFAULT_POINT_MARGIN,
            palm_margin: DEFAULT_PALM_MARGIN,
            tie_break: TieBreak::Priority,
            blend_pinch_confidence: true,
        }
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            filter: "majority".to_string(),
            window_size: DEFAULT_STABILITY_WINDOW,
            majority_ratio: DEFAULT_MAJORITY_RATIO,
        }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            reset_hold_ms: DEFAULT_RESET_HOLD_MS,
            reset_stability_frames: DEFAULT_RESET_STABILITY_FRAMES,
            palm_frontality_threshold: DEFAULT_PALM_FRONTALITY_THRESHOLD,
            movement_threshold: DEFAULT_MOVEMENT_THRESHOLD,
            min_finger_spread: DEFAULT_MIN_FINGER_SPREAD,
            wrist_buffer_size: DEFAULT_WRIST_BUFFER_SIZE,
        }
    }
}

impl LockConfig {
    /// Reset hold duration
    #[must_use]
    pub const fn reset_hold(&self) -> Duration {
        Duration::from_millis(self.reset_hold_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Create the stability filter described by this configuration
    pub fn create_filter(&self) -> Result<Box<dyn GestureFilter>> {
        use crate::filters::{create_filter, MajorityVoteFilter};

        match self.stability.filter.as_str() {
            "majority" => {
                if self.stability.window_size == 0 {
                    return Err(Error::FilterError("Window size must be greater than 0".to_string()));
                }
                if !(self.stability.majority_ratio > 0.0 && self.stability.majority_ratio <= 1.0) {
                    return Err(Error::FilterError("Majority ratio must be in (0, 1]".to_string()));
                }
                Ok(Box::new(MajorityVoteFilter::new(
                    self.stability.window_size,
                    self.stability.majority_ratio,
                )))
            }
            name => create_filter(name),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Classifier thresholds
        if !(self.classifier.pinch_threshold > 0.0) {
            return Err(Error::ConfigError("Pinch threshold must be positive".to_string()));
        }
        if !(0.0..=std::f64::consts::PI).contains(&self.classifier.finger_extension_angle) {
            return Err(Error::ConfigError(
                "Finger extension angle must be between 0 and pi".to_string(),
            ));
        }
        if !(self.classifier.point_margin >= 0.0 && self.classifier.palm_margin >= 0.0) {
            return Err(Error::ConfigError("Margins must be non-negative".to_string()));
        }

        // Stability filter
        self.create_filter()
            .map_err(|e| Error::ConfigError(format!("Invalid stability filter: {e}")))?;

        // Lock and reset pose
        if self.lock.reset_stability_frames == 0 {
            return Err(Error::ConfigError(
                "Reset stability frames must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.lock.palm_frontality_threshold) {
            return Err(Error::ConfigError(
                "Palm frontality threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(self.lock.movement_threshold > 0.0) {
            return Err(Error::ConfigError("Movement threshold must be positive".to_string()));
        }
        if !(self.lock.min_finger_spread >= 0.0) {
            return Err(Error::ConfigError(
                "Minimum finger spread must be non-negative".to_string(),
            ));
        }
        if self.lock.wrist_buffer_size == 0 {
            return Err(Error::ConfigError(
                "Wrist buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gesture Effects Configuration

# Gesture classifier
classifier:
  pinch_threshold: 0.07
  finger_extension_angle: 1.8849555921538759  # 0.6 * pi
  point_margin: 0.05
  palm_margin: 0.02
  tie_break: "priority"
  blend_pinch_confidence: true

# Stability filter
stability:
  filter: "majority"
  window_size: 5
  majority_ratio: 0.6

# Lock and reset pose
lock:
  reset_hold_ms: 1500
  reset_stability_frames: 5
  palm_frontality_threshold: 0.6
  movement_threshold: 0.03
  min_finger_spread: 0.07
  wrist_buffer_size: 5
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.classifier.pinch_threshold, defaults.classifier.pinch_threshold);
        assert!((parsed.classifier.finger_extension_angle - defaults.classifier.finger_extension_angle).abs() < 1e-12);
        assert_eq!(parsed.classifier.tie_break, TieBreak::Priority);
        assert_eq!(parsed.stability.window_size, 5);
        assert_eq!(parsed.lock.reset_hold(), Duration::from_millis(1500));
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = Config::from_yaml("lock:\n  reset_hold_ms: 800\n").unwrap();
        assert_eq!(parsed.lock.reset_hold_ms, 800);
        assert_eq!(parsed.lock.reset_stability_frames, 5);
        assert_eq!(parsed.stability.filter, "majority");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.lock.palm_frontality_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.stability.majority_ratio = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.stability.filter = "kalman".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.pinch_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_nan() {
        let nan_configs: [fn(&mut Config); 6] = [
            |c| c.classifier.pinch_threshold = f64::NAN,
            |c| c.classifier.point_margin = f64::NAN,
            |c| c.classifier.palm_margin = f64::NAN,
            |c| c.lock.movement_threshold = f64::NAN,
            |c| c.lock.min_finger_spread = f64::NAN,
            |c| c.lock.palm_frontality_threshold = f64::NAN,
        ];
        for (i, set_nan) in nan_configs.iter().enumerate() {
            let mut config = Config::default();
            set_nan(&mut config);
            assert!(config.validate().is_err(), "NaN case {} accepted", i);
        }
    }
}
