//! Cart handlers.
//!
//! Both handlers receive the session id through [`CurrentSession`] and pass it
//! explicitly to the repository.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use cartstore_core::cart::{AddItemRequest, Cart};

use super::json::{message_response, PrettyJson};
use crate::{context::CurrentSession, handlers::AppError, state::AppState};

/// Get the session's cart (GET /api/cart).
///
/// Renders the cart with 200, or `{"message": "Cart not found"}` with 404 when
/// the session has no cart yet.
#[axum::debug_handler(state = AppState)]
pub async fn get_cart(
    State(state): State<AppState>,
    CurrentSession(session_id): CurrentSession,
) -> Result<Response, AppError> {
    match state.carts.get_cart(&session_id).await? {
        Some(cart) => Ok(PrettyJson(StatusCode::OK, cart).into_response()),
        None => Ok(message_response(StatusCode::NOT_FOUND, "Cart not found").into_response()),
    }
}

/// Append an item to the session's cart (POST /api/cart/items).
///
/// Starts a new cart when the session has none, then saves the whole cart.
/// Store failures are returned whatever the degrade policy. A cart that could
/// not be read is never overwritten, and 201 means the cart was stored.
#[axum::debug_handler(state = AppState)]
pub async fn add_item(
    State(state): State<AppState>,
    CurrentSession(session_id): CurrentSession,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    tracing::debug!(session_id = %session_id, request = ?request, "Received add item request");

    let item = request.into_item()?;

    let mut cart = state
        .carts
        .load_for_update(&session_id)
        .await?
        .unwrap_or_else(|| Cart::for_session(&session_id));

    tracing::info!(
        session_id = %session_id,
        item_uuid = %item.uuid(),
        product_uuid = %item.product_uuid(),
        "Adding item to cart"
    );
    cart.add_item(item);

    state.carts.store_update(&session_id, &cart).await?;

    Ok(PrettyJson(StatusCode::CREATED, cart).into_response())
}
