//! Error types for the CLI application.
//!
//! Every command handler returns `Result<(), CliError>`; [`crate::run`] maps
//! the variant to an exit code.
//!
//! ## Line Errors
//!
//! [`BatchValidationError`] pairs a failure with the item it belongs to. The
//! `stats` command uses it to report corrupted JSONL lines by file and line
//! number.

use besigue_ai::UnknownProvider;
use besigue_engine::errors::GameError;
use std::fmt;

use crate::config::ConfigError;

#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine rejected an operation
    Engine(String),

    /// Operation was interrupted (e.g., the player quit mid-game)
    Interrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<UnknownProvider> for CliError {
    fn from(error: UnknownProvider) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

/// A failure tied to one item of a batch.
///
/// # Examples
///
/// ```rust
/// use besigue_cli::BatchValidationError;
///
/// let error = BatchValidationError {
///     item_context: "rounds.jsonl:7",
///     message: "invalid JSON".to_string(),
/// };
/// assert_eq!(error.to_string(), "rounds.jsonl:7: invalid JSON");
/// ```
#[derive(Debug)]
pub struct BatchValidationError<T> {
    pub item_context: T,
    pub message: String,
}

impl<T: fmt::Display> fmt::Display for BatchValidationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_context, self.message)
    }
}
