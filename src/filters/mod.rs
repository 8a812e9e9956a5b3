//! Stability filters for per-frame gesture observations.
//!
//! A filter consumes one raw [`GestureObservation`] per cycle and reports the
//! class it considers stable, or [`GestureClass::None`] while undecided.

/// Majority vote over a fixed window of observations
pub mod majority;

pub use majority::MajorityVoteFilter;

use crate::{
    classifier::{GestureClass, GestureObservation},
    constants::{DEFAULT_MAJORITY_RATIO, DEFAULT_STABILITY_WINDOW},
    Error, Result,
};

/// Trait for all gesture stability filters
pub trait GestureFilter {
    /// Feed one observation and return the stable class
    fn observe(&mut self, observation: GestureObservation) -> GestureClass;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes every observation's class straight through
pub struct PassThroughFilter;

impl GestureFilter for PassThroughFilter {
    fn observe(&mut self, observation: GestureObservation) -> GestureClass {
        observation.class
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "PassThroughFilter"
    }
}

fn parse_param<T: std::str::FromStr>(filter_type: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::FilterError(format!("Invalid parameter '{value}' for filter {filter_type}")))
}

/// Create a gesture filter by type name.
///
/// Accepts `none`, `majority`, `majority:<window>` and
/// `majority:<window>:<ratio>`.
pub fn create_filter(filter_type: &str) -> Result<Box<dyn GestureFilter>> {
    let normalized = filter_type.to_lowercase();
    let mut parts = normalized.split(':');
    let name = parts.next().unwrap_or_default();
    let params: Vec<&str> = parts.collect();

    match (name, params.as_slice()) {
        ("none" | "passthrough", []) => Ok(Box::new(PassThroughFilter)),
        ("majority" | "stability", rest) if rest.len() <= 2 => {
            let window = match rest.first() {
                Some(v) => parse_param::<usize>(filter_type, v)?,
                None => DEFAULT_STABILITY_WINDOW,
            };
            let ratio = match rest.get(1) {
                Some(v) => parse_param::<f64>(filter_type, v)?,
                None => DEFAULT_MAJORITY_RATIO,
            };
            if window == 0 {
                return Err(Error::FilterError("Window size must be greater than 0".to_string()));
            }
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(Error::FilterError(format!("Majority ratio must be in (0, 1], got {ratio}")));
            }
            Ok(Box::new(MajorityVoteFilter::new(window, ratio)))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {filter_type}"))),
    }
}
