use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    context::SESSION_HEADER,
    handlers::{
        cart::{add_item, get_cart},
        health::{livez, readyz},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)]);

    // API routes with CORS
    let api_routes = Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/items", post(add_item))
        .layer(cors);

    // Main application router
    Router::new()
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::{
        str::FromStr,
        sync::{
            atomic::{AtomicU32, Ordering},
            Arc,
        },
        time::Duration,
    };

    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use cartstore_core::{
        cart::{Cart, CartItem},
        session::SessionId,
        store::{KeyValueStore, Result as StoreResult, StoreError},
    };
    use http_body_util::BodyExt;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use crate::{
        config::Config,
        handlers::json::JSON_CONTENT_TYPE,
        repository::DegradePolicy,
        store::{MemoryStore, UnavailableStore},
    };

    /// Memory store whose next `get` or `set` calls can be made to time out.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing_gets: AtomicU32,
        failing_sets: AtomicU32,
    }

    impl FlakyStore {
        fn timeout() -> StoreError {
            StoreError::Timeout(Duration::from_millis(500))
        }

        fn take_failure(counter: &AtomicU32) -> bool {
            counter
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
            if Self::take_failure(&self.failing_gets) {
                return Err(Self::timeout());
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
            if Self::take_failure(&self.failing_sets) {
                return Err(Self::timeout());
            }
            self.inner.set(key, value).await
        }

        async fn ping(&self) -> StoreResult<()> {
            self.inner.ping().await
        }
    }

    fn item_body(uuid: &str) -> String {
        format!(
            r#"{{"uuid": "{uuid}", "productUuid": "prod-{uuid}", "price": 2.5, "quantity": 1}}"#
        )
    }

    fn item_uuids(json: &serde_json::Value) -> Vec<String> {
        json["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["uuid"].as_str().unwrap().to_string())
            .collect()
    }

    fn unavailable_state(policy: DegradePolicy) -> AppState {
        let store = UnavailableStore::new(&StoreError::ConnectionFailed(
            "Connection refused".to_string(),
        ));
        let config = Config {
            degrade_policy: policy,
            ..Config::default()
        };
        AppState::new(Arc::new(store), &config)
    }

    fn get_cart_request(session: &str) -> Request<Body> {
        Request::builder()
            .uri("/api/cart")
            .header("Cookie", format!("session_id={session}"))
            .body(Body::empty())
            .unwrap()
    }

    fn add_item_request(session: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/cart/items")
            .header("Cookie", format!("session_id={session}"))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_get_cart_not_found() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_cart_request("abc-123")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            JSON_CONTENT_TYPE
        );
        assert_eq!(
            body_string(response).await,
            "{\n  \"message\": \"Cart not found\"\n}"
        );
    }

    #[tokio::test]
    async fn test_saved_cart_is_served() {
        let state = AppState::default();
        let app = create_app(state.clone());
        let session = SessionId::parse("abc-123").unwrap();

        let response = app
            .clone()
            .oneshot(get_cart_request("abc-123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let item = CartItem::new("item-1", "prod-1", Decimal::from_str("9.99").unwrap(), 2)
            .unwrap();
        let cart = Cart::for_session(&session).with_items(vec![item]);
        state.carts.save_cart(&session, &cart).await.unwrap();

        let response = app.oneshot(get_cart_request("abc-123")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["uuid"], "abc-123");
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
        assert_eq!(json["items"][0]["productUuid"], "prod-1");
        assert_eq!(json["items"][0]["price"], 9.99);
        assert_eq!(json["items"][0]["quantity"], 2);
    }

    #[tokio::test]
    async fn test_session_header_is_accepted() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cart")
                    .header(SESSION_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_session_is_bad_request() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(Request::builder().uri("/api/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Missing session identifier");
    }

    #[tokio::test]
    async fn test_add_item_creates_cart() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(add_item_request(
                "abc-123",
                r#"{"productUuid": "prod-1", "price": 9.99, "quantity": 2}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["uuid"], "abc-123");
        assert!(!json["items"][0]["uuid"].as_str().unwrap().is_empty());

        // Second item lands in the same cart
        let response = app
            .clone()
            .oneshot(add_item_request(
                "abc-123",
                r#"{"uuid": "item-2", "productUuid": "prod-2", "price": 1.5, "quantity": 1}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(get_cart_request("abc-123")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
        assert_eq!(json["items"][1]["uuid"], "item-2");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(add_item_request(
                "session-a",
                r#"{"productUuid": "prod-1", "price": 3, "quantity": 1}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(get_cart_request("session-b")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_invalid_item_is_unprocessable() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(add_item_request(
                "abc-123",
                r#"{"productUuid": "prod-1", "price": -1.0, "quantity": 1}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_add_item_with_over_precise_price_is_unprocessable() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(add_item_request(
                "abc-123",
                r#"{"productUuid": "prod-1", "price": 9.12345, "quantity": 1}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Price has more than 4 decimal places: 9.12345");
    }

    #[tokio::test]
    async fn test_add_item_malformed_json() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(add_item_request("abc-123", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_server_error() {
        let store = MemoryStore::new();
        store.set("abc-123", b"not a cart").await.unwrap();
        let app = create_app(AppState::new(Arc::new(store), &Config::default()));

        let response = app.oneshot(get_cart_request("abc-123")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Cart record is corrupt");
    }

    #[tokio::test]
    async fn test_unavailable_store_serves_empty_cart() {
        let app = create_app(unavailable_state(DegradePolicy::EmptyCart));

        let response = app.oneshot(get_cart_request("abc-123")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["uuid"], "abc-123");
        assert!(json["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store_with_fail_policy() {
        let app = create_app(unavailable_state(DegradePolicy::Fail));

        let response = app.oneshot(get_cart_request("abc-123")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Cart store unavailable");
    }

    #[tokio::test]
    async fn test_add_item_after_failed_read_keeps_stored_items() {
        let store = Arc::new(FlakyStore::default());
        let app = create_app(AppState::new(store.clone(), &Config::default()));

        for uuid in ["i1", "i2", "i3"] {
            let response = app
                .clone()
                .oneshot(add_item_request("abc-123", &item_body(uuid)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        store.failing_gets.store(1, Ordering::SeqCst);
        let response = app
            .clone()
            .oneshot(add_item_request("abc-123", &item_body("i4")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app
            .clone()
            .oneshot(get_cart_request("abc-123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(item_uuids(&body_json(response).await), ["i1", "i2", "i3"]);

        // Retrying once the store recovers appends to the full cart
        let response = app
            .oneshot(add_item_request("abc-123", &item_body("i4")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            item_uuids(&body_json(response).await),
            ["i1", "i2", "i3", "i4"]
        );
    }

    #[tokio::test]
    async fn test_add_item_failed_save_is_not_created() {
        let store = Arc::new(FlakyStore::default());
        let app = create_app(AppState::new(store.clone(), &Config::default()));

        store.failing_sets.store(1, Ordering::SeqCst);
        let response = app
            .clone()
            .oneshot(add_item_request("abc-123", &item_body("i1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app.oneshot(get_cart_request("abc-123")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_item_with_unavailable_store() {
        let app = create_app(unavailable_state(DegradePolicy::EmptyCart));

        let response = app
            .oneshot(add_item_request("abc-123", &item_body("i1")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Cart store unavailable");
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(unavailable_state(DegradePolicy::EmptyCart));

        let response = app
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readyz_ok() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["store"], "ok");
    }

    #[tokio::test]
    async fn test_readyz_store_unavailable() {
        let app = create_app(unavailable_state(DegradePolicy::EmptyCart));

        let response = app
            .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["store"], "unavailable");
    }
}
