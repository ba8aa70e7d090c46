//! Error types for the head zone control library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Perception collaborator or media source could not be acquired
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// A single frame could not be processed (malformed frame, detection fault)
    #[error("Transient frame fault: {0}")]
    TransientFrame(String),

    /// Configuration option out of range
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Lifecycle operation not allowed in the current loop state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
