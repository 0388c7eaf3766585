//! Unified error handling.
//!
//! Store operations never fail; these errors come from wiring the application
//! together (configuration, tenant lists, state) and from user input at the
//! CLI boundary. Each variant maps to a sysexits-style process exit code.

use thiserror::Error;

use tavola_core::SlugError;

use crate::config::ConfigError;
use crate::state::StateError;
use crate::tenant::DirectoryError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tenant list could not be loaded.
    #[error("Tenant directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// A store was used without being mounted.
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL given by the user did not parse.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A slug given by the user is malformed.
    #[error("Invalid slug: {0}")]
    Slug(#[from] SlugError),

    /// Lookup found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Directory(_) | Self::State(_) => 78,
            Self::Io(_) => 74,
            Self::Url(_) | Self::Slug(_) | Self::BadRequest(_) => 65,
            Self::NotFound(_) => 1,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
