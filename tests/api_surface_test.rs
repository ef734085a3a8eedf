//! HTTP-level tests: router wiring, auth extraction, response envelopes,
//! and error payload mapping.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::TestHarness;
use eventsphere_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    entities::user::Role,
    events::EventSender,
    AppState,
};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;

const TEST_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";

struct TestApi {
    router: Router,
    auth: Arc<AuthService>,
    harness: TestHarness,
}

impl TestApi {
    async fn new() -> Self {
        let harness = TestHarness::new().await;

        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            TEST_SECRET.into(),
            3600,
            "127.0.0.1".into(),
            18080,
            "test".into(),
        );

        let (tx, _rx) = mpsc::channel(16);
        let state = AppState {
            db: harness.db.clone(),
            config: cfg,
            event_sender: EventSender::new(tx),
            services: harness.services.clone(),
        };

        let auth = Arc::new(AuthService::new(AuthConfig::new(TEST_SECRET.into(), 3600)));

        let auth_for_layer = auth.clone();
        let router = Router::new()
            .nest("/api/v1", eventsphere_api::api_v1_routes())
            .layer(axum::middleware::from_fn_with_state(
                auth_for_layer,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: axum::http::Request<Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ))
            .layer(axum::middleware::from_fn(
                eventsphere_api::request_id::request_id_middleware,
            ))
            .with_state(state);

        Self {
            router,
            auth,
            harness,
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json_body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json_body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

#[tokio::test]
async fn status_endpoint_is_public() {
    let api = TestApi::new().await;
    let (status, body) = api.request(Method::GET, "/api/v1/status", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["service"], json!("eventsphere-api"));
    assert!(body["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn event_browse_is_public_and_enveloped() {
    let api = TestApi::new().await;
    let organizer = api.harness.seed_user("Org", Role::Organizer, 0).await;
    api.harness.seed_event(&organizer, dec!(10), 5).await;

    let (status, body) = api.request(Method::GET, "/api/v1/events", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));
    assert_eq!(body["data"]["events"][0]["title"], json!("Rustfest"));
}

#[tokio::test]
async fn booking_requires_a_bearer_token() {
    let api = TestApi::new().await;
    let (status, _) = api
        .request(
            Method::POST,
            "/api/v1/bookings",
            None,
            Some(json!({"event_id": uuid::Uuid::new_v4(), "quantity": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_and_payment_round_trip_over_http() {
    let api = TestApi::new().await;
    let organizer = api.harness.seed_user("Org", Role::Organizer, 0).await;
    let customer = api.harness.seed_user("Cust", Role::Customer, 0).await;
    let ev = api.harness.seed_event(&organizer, dec!(25), 10).await;

    let token = api
        .auth
        .issue_token(customer.id, Some(&customer.full_name), Role::Customer)
        .unwrap();

    let (status, body) = api
        .request(
            Method::POST,
            "/api/v1/bookings",
            Some(&token),
            Some(json!({"event_id": ev.id, "quantity": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["data"]["id"].as_str().expect("booking id").to_string();

    let (status, body) = api
        .request(
            Method::POST,
            &format!("/api/v1/bookings/{booking_id}/payment"),
            Some(&token),
            Some(json!({"payment_method": "card", "use_points": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["payment_status"], json!("Completed"));
    assert_eq!(body["data"]["final_amount"], json!("50"));
    assert!(body["data"]["payment"]["invoice_number"]
        .as_str()
        .unwrap()
        .starts_with("INV-"));
}

#[tokio::test]
async fn missing_booking_maps_to_not_found_envelope() {
    let api = TestApi::new().await;
    let customer = api.harness.seed_user("Cust", Role::Customer, 0).await;
    let token = api
        .auth
        .issue_token(customer.id, None, Role::Customer)
        .unwrap();

    let (status, body) = api
        .request(
            Method::GET,
            &format!("/api/v1/bookings/{}", uuid::Uuid::new_v4()),
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Not Found"));
    assert!(body["request_id"].is_string());
}
