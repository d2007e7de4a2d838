//! Application error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors surfaced to callers.
///
/// The recognized variants carry a sanitized message that is safe to show to
/// clients; the underlying cause is logged at the point of origin before the
/// conversion. `Internal` is the opaque category for everything else and
/// renders as a bare 400.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error while handling link: {link}")]
    Resolution { link: String },

    #[error("Error while handling steamid: {steamid}")]
    Fetch { steamid: String },

    #[error("Error while handling appid: {appid}")]
    Enrichment { appid: u64 },

    #[error("Error while handling tag: {tag}")]
    TagLookup { tag: String },

    #[error("{0}")]
    Validation(String),

    #[error("Server error")]
    Internal,
}

impl AppError {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, AppError::Internal)
    }

    /// Message the client may see, or `None` for the opaque category.
    pub fn client_message(&self) -> Option<String> {
        self.is_recognized().then(|| self.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.client_message() {
            Some(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            None => StatusCode::BAD_REQUEST.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_errors_expose_their_message() {
        let err = AppError::Resolution {
            link: "https://steamcommunity.com/id/alice/".to_string(),
        };
        assert_eq!(
            err.client_message().as_deref(),
            Some("Error while handling link: https://steamcommunity.com/id/alice/")
        );
    }

    #[test]
    fn internal_errors_stay_opaque() {
        assert_eq!(AppError::Internal.client_message(), None);
    }
}
