//! EventSphere API Library
//!
//! This crate provides the core functionality for the EventSphere
//! ticketing API
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod openapi;
pub mod request_id;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::request_id::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

// Enhanced API routes function
pub fn api_v1_routes() -> Router<AppState> {
    let events = Router::new()
        .route("/events", get(handlers::events::list_events))
        .route("/events/:id", get(handlers::events::get_event))
        .route(
            "/events/:id/availability",
            get(handlers::events::get_availability),
        )
        .route(
            "/events",
            axum::routing::post(handlers::events::create_event),
        )
        .route(
            "/events/:id",
            axum::routing::put(handlers::events::update_event),
        )
        .route(
            "/events/:id/cancel",
            axum::routing::post(handlers::events::cancel_event),
        )
        .route(
            "/events/:id",
            axum::routing::delete(handlers::events::delete_event),
        );

    let bookings = Router::new()
        .route(
            "/bookings",
            axum::routing::post(handlers::bookings::create_booking),
        )
        .route("/bookings", get(handlers::bookings::list_my_bookings))
        .route("/bookings/:id", get(handlers::bookings::get_booking))
        .route(
            "/bookings/:id/payment",
            axum::routing::post(handlers::bookings::confirm_payment),
        )
        .route(
            "/bookings/:id/check-in",
            axum::routing::post(handlers::bookings::check_in),
        );

    let promotions = Router::new()
        .route("/promotions/active", get(handlers::promotions::list_active))
        .route(
            "/promotions",
            axum::routing::post(handlers::promotions::create_promotion),
        );

    let loyalty = Router::new()
        .route("/loyalty/balance", get(handlers::loyalty::get_balance))
        .route("/loyalty/history", get(handlers::loyalty::get_history));

    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(events)
        .merge(bookings)
        .merge(promotions)
        .merge(loyalty)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "eventsphere-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response = crate::request_id::scope_request_id(
            crate::request_id::RequestId::new("meta-123"),
            async { ApiResponse::success("ok") },
        )
        .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response = crate::request_id::scope_request_id(
            crate::request_id::RequestId::new("meta-err"),
            async { ApiResponse::<()>::error("oops".into()) },
        )
        .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!meta.timestamp.is_empty());
    }
}
