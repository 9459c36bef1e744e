//! Error handling for the command pacing engine.
//!
//! This module defines a single error type covering the ways a run can fail,
//! from bad configuration to a launched command reporting a nonzero exit.

use std::fmt;

/// Main error type for command pacing operations.
///
/// Configuration and template errors are detected before any command starts;
/// spawn and command failures are per-task and end the whole run (fail-fast).
#[derive(Debug, Clone)]
pub enum CmdPaceError {
    /// Invalid run configuration (zero rate/inflight, unusable input source)
    ConfigError { message: String },

    /// Invalid command template (empty program, missing placeholder)
    TemplateError { message: String },

    /// The child process could not be started
    SpawnError { program: String, message: String },

    /// The child process ran but reported failure.
    /// `code` is `None` when the child was terminated by a signal.
    CommandFailed { program: String, code: Option<i32> },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl CmdPaceError {
    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new template error.
    pub fn template<M: Into<String>>(message: M) -> Self {
        Self::TemplateError {
            message: message.into(),
        }
    }

    /// Create a new spawn error.
    pub fn spawn<P: Into<String>, M: Into<String>>(program: P, message: M) -> Self {
        Self::SpawnError {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Create a new command failure from an exit code (`None` = signal).
    pub fn command_failed<P: Into<String>>(program: P, code: Option<i32>) -> Self {
        Self::CommandFailed {
            program: program.into(),
            code,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error was raised before any command started.
    ///
    /// Configuration and template errors never enter the processing loop,
    /// so callers can report them without worrying about in-flight work.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigError { .. } | Self::TemplateError { .. })
    }
}

impl fmt::Display for CmdPaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::TemplateError { message } => {
                write!(f, "Template error: {}", message)
            }
            Self::SpawnError { program, message } => {
                write!(f, "Failed to start '{}': {}", program, message)
            }
            Self::CommandFailed { program, code } => match code {
                Some(code) => write!(f, "Command '{}' exited with status {}", program, code),
                None => write!(f, "Command '{}' was terminated by a signal", program),
            },
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for CmdPaceError {}

// Implement From conversions for common error types
impl From<std::io::Error> for CmdPaceError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}
