use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use cartstore_core::cart::CartError;
use cartstore_core::store::{repository_error_to_status_code, RepositoryError};

use super::json::message_response;

/// Application error type that wraps `anyhow::Error`.
///
/// Known error types are downcast to pick the status code and a message that
/// is safe to show the client.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let status = StatusCode::from_u16(repository_error_to_status_code(repo_error))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let message = match repo_error {
                RepositoryError::Store(_) => "Cart store unavailable".to_string(),
                RepositoryError::CorruptRecord { .. } => "Cart record is corrupt".to_string(),
                RepositoryError::Serialization(_) => "Internal server error".to_string(),
                RepositoryError::KeyMismatch { .. } => repo_error.to_string(),
            };
            (status, message)
        } else if let Some(cart_error) = self.0.downcast_ref::<CartError>() {
            (StatusCode::UNPROCESSABLE_ENTITY, cart_error.to_string())
        } else if let Some(rejection) = self.0.downcast_ref::<JsonRejection>() {
            (rejection.status(), rejection.body_text())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self.0, status = %status, "Application error");
        } else {
            tracing::warn!(error = %self.0, status = %status, "Request rejected");
        }

        message_response(status, message).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
