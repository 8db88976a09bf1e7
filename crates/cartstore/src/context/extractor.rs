//! Axum extractor for the caller's session identifier.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use cartstore_core::session::SessionId;

use crate::{handlers::json::message_response, state::AppState};

/// Header consulted when the session cookie is absent.
pub const SESSION_HEADER: &str = "x-session-id";

/// The session identifier of the current request.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionId);

/// Reads the session id from the named cookie, falling back to [`SESSION_HEADER`].
fn extract_session_id(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    let jar = CookieJar::from_headers(headers);
    jar.get(cookie_name)
        .and_then(|cookie| SessionId::parse(cookie.value()))
        .or_else(|| {
            headers
                .get(SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(SessionId::parse)
        })
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_session_id(&parts.headers, &state.session_cookie_name)
            .map(CurrentSession)
            .ok_or_else(|| {
                tracing::debug!("Request without session identifier");
                message_response(StatusCode::BAD_REQUEST, "Missing session identifier")
                    .into_response()
            })
    }
}
