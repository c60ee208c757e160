//! Error kinds surfaced by the remote clients and the storage adapter.
//!
//! Fallible calls return `anyhow::Result`; the kinds below travel inside the
//! `anyhow::Error` and can be recovered with `downcast_ref::<AppError>()`.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The request never produced a response (DNS, TLS, timeout, reset).
    #[error("network request failed: {0}")]
    Network(String),

    /// The remote answered with a non-success status.
    #[error("{url} -> {status}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AppError {
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Http { .. })
    }
}

/// Walks the chain of an `anyhow::Error` looking for a typed kind.
pub fn kind_of(err: &anyhow::Error) -> Option<&AppError> {
    err.chain().find_map(|e| e.downcast_ref::<AppError>())
}

/// Message shown to the user when a remote call fails.
pub fn user_message(err: &anyhow::Error) -> String {
    match kind_of(err) {
        Some(AppError::Http { status, .. }) => {
            format!("Request failed with status {}", status)
        }
        Some(AppError::Network(_)) => "Network error, check your connection".to_string(),
        _ => format!("{:#}", err),
    }
}
