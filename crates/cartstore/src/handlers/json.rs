//! JSON response rendering.
//!
//! Bodies are pretty-printed UTF-8 with forward slashes left unescaped
//! (serde_json never escapes them).

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A status code and a value rendered as pretty-printed JSON.
#[derive(Debug)]
pub struct PrettyJson<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        let PrettyJson(status, value) = self;
        match serde_json::to_vec_pretty(&value) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
                body,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Failed to render JSON response");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Body of every non-cart response: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Builds a `{"message": ...}` response with the given status.
pub fn message_response(status: StatusCode, message: impl Into<String>) -> PrettyJson<MessageBody> {
    PrettyJson(
        status,
        MessageBody {
            message: message.into(),
        },
    )
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_string(response: Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_message_response_is_pretty_json() {
        let response = message_response(StatusCode::NOT_FOUND, "Cart not found").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        assert_eq!(
            body_string(response).await,
            "{\n  \"message\": \"Cart not found\"\n}"
        );
    }

    #[tokio::test]
    async fn test_forward_slashes_are_not_escaped() {
        let response =
            PrettyJson(StatusCode::OK, serde_json::json!({"url": "https://shop.example/p/1"}))
                .into_response();

        assert!(body_string(response)
            .await
            .contains("\"https://shop.example/p/1\""));
    }
}
