//! Error types for the gesture effects library.

use thiserror::Error;

use crate::effects::EffectId;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Gesture filter name or parameter error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An effect module is already registered under this id
    #[error("Effect {0} is already registered")]
    DuplicateEffect(EffectId),

    /// Registration attempted after the effect manager was started
    #[error("Effect registry is frozen once the manager is initialized")]
    RegistryFrozen,

    /// Effect manager used before `init`
    #[error("Effect manager is not initialized")]
    NotInitialized,

    /// Effect manager `init` called twice
    #[error("Effect manager is already initialized")]
    AlreadyInitialized,

    /// Recording could not be decoded
    #[error("Recording error: {0}")]
    RecordingError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Application-specific error type (alias for main Error type)
pub type AppError = Error;

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
