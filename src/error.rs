//! Error types for the plexus engine.

use thiserror::Error;

use crate::frame::LifecycleState;

/// Result type alias for plexus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid capacity, threshold or count relationship.
    ///
    /// Raised by config validation, `start()` and rejected reconfigurations.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Operation invoked in a state that does not allow it.
    #[error("Cannot {operation} while {state}")]
    Lifecycle {
        operation: &'static str,
        state: LifecycleState,
    },
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Shorthand for a lifecycle error.
    pub fn lifecycle(operation: &'static str, state: LifecycleState) -> Self {
        Self::Lifecycle { operation, state }
    }

    /// Whether this error came from config validation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether this error came from the lifecycle state machine.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Lifecycle { .. })
    }
}
