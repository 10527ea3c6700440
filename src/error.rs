//! Error handling module for the Purr installer
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Library code returns [`Result`]; the binary wraps these in `anyhow` at the
//! process boundary.

use thiserror::Error;

/// Main error type for the installer
#[derive(Error, Debug)]
pub enum InstallerError {
    /// IO errors (file operations, terminal, child processes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A system query (block devices, partitions, timezones, locales) failed
    #[error("Enumeration error: {0}")]
    Enumeration(String),

    /// Validation errors (user input, configuration invariants)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Script persistence or execution errors
    #[error("Script error: {0}")]
    Script(String),

    /// JSON parsing errors (lsblk output)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The user aborted the wizard (Esc or Ctrl+C)
    #[error("Installation cancelled by user")]
    Cancelled,
}

/// Result type alias for installer operations
pub type Result<T> = std::result::Result<T, InstallerError>;

// Convenient error constructors
impl InstallerError {
    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create an enumeration error
    pub fn enumeration(msg: impl Into<String>) -> Self {
        Self::Enumeration(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a script error
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }

    /// Whether this error is the user's explicit abort
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
