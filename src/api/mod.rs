//! REST persistence boundary: error taxonomy and the clinic API client.

pub mod client;

pub use client::{EmrClient, RequestContext};

use thiserror::Error;

/// Errors from the persistence boundary, classified by HTTP status the
/// way the forms surface them to the user. All are terminal to the
/// current action; the draft is kept so no input is lost.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation rejected by server: {0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

impl ApiError {
    /// Classify a non-success response by status code.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            400 => ApiError::Validation(message),
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Unexpected { status, message },
        }
    }

    /// User-facing message for transient UI notices.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation error. Please check your input.",
            ApiError::Unauthorized => "Unauthorized. Please log in again.",
            ApiError::NotFound(_) => "Record not found.",
            ApiError::Server { .. } => "Server error. Please try again later.",
            ApiError::Transport(_) => "No response from server. Please check your connection.",
            ApiError::Unexpected { .. } => "Failed to save. Please try again.",
        }
    }
}

/// Pull a human message out of a structured error body, falling back to
/// the raw body (or a placeholder when empty).
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
        if let Some(error) = value.get("error").and_then(|m| m.as_str()) {
            return error.to_string();
        }
    }
    if body.trim().is_empty() {
        "no response body".to_string()
    } else {
        body.trim().to_string()
    }
}
