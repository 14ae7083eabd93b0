//! Error types for the farm host binary.
//!
//! [`EngineError`] wraps every failure mode during startup and shutdown so
//! the helpers in `main` can propagate with `?`.

/// Top-level error for the farm host binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: duofarm_core::ConfigError,
    },

    /// Restoring or saving the farm failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: duofarm_core::SessionError,
    },

    /// Writing the final snapshot failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: duofarm_core::StoreError,
    },
}
