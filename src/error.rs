// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types and the error-sink capability.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Store read failed; fatal to the current call, no partial result.
    #[error("Store read error: {0}")]
    StoreRead(String),

    /// Store write failed; fatal to the mutation attempt, no automatic retry.
    #[error("Store write error: {0}")]
    StoreWrite(String),

    /// Place provider failed; discovery degrades to local-only results.
    #[error("Place provider error: {0}")]
    Provider(String),

    /// A single participant profile could not be fetched; tolerated per id.
    #[error("Participant resolution error for {uid}: {message}")]
    ParticipantResolution { uid: String, message: String },

    /// The live event query failed; fatal to the watch subscription.
    #[error("Timeline aggregation error: {0}")]
    Aggregation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Side-effecting notification channel for errors surfaced to the UI layer.
///
/// Non-fatal warnings (a degraded discovery) and fatal subscription errors
/// both pass through here; nothing is silently swallowed.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &AppError);
}

/// Default sink that reports through the tracing subscriber.
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, error: &AppError) {
        match error {
            AppError::Provider(msg) => {
                tracing::warn!(error = %msg, "Place provider degraded");
            }
            AppError::ParticipantResolution { uid, message } => {
                tracing::warn!(uid = %uid, error = %message, "Participant resolution failed");
            }
            other => {
                tracing::error!(error = %other, "Operation failed");
            }
        }
    }
}
