//! # AppError
//!
//! Centralized error handling for the Spill workspace. Maps domain-specific
//! failures to actionable error types.

use thiserror::Error;

/// The primary error type for all spill-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Profile, Post, Comment, Report)
    #[error("{0} not found")]
    NotFound(String),

    /// Validation failure (e.g., subject too long, bad handle)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Authorization failure (e.g., suspended account, non-moderator)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure surfaced by a storage plugin
    #[error("internal service error: {0}")]
    Internal(String),

    /// Resource already exists (e.g., duplicate handle)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Cooldown or rate-limit window still open
    #[error("too many requests: {0}")]
    RateLimitExceeded(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}

/// A specialized Result type for Spill logic.
pub type Result<T> = std::result::Result<T, AppError>;
