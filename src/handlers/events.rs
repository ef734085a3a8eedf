use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::entities::event::Model as EventModel;
use crate::errors::ServiceError;
use crate::services::event_catalog::{
    CreateEventRequest, EventListQuery, EventListView, UpdateEventRequest,
};
use crate::{ApiResponse, AppState};

/// Browse published events
#[utoipa::path(
    get,
    path = "/api/v1/events",
    summary = "List events",
    params(
        ("search" = Option<String>, Query, description = "Title search term"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("upcoming_only" = Option<bool>, Query, description = "Hide ended events (default true)"),
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Events retrieved successfully"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<ApiResponse<EventListView>>, ServiceError> {
    let result = state.services.catalog.list_events(query).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// Event details
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    summary = "Get event",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event retrieved successfully"),
        (status = 404, description = "Event not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventModel>>, ServiceError> {
    let ev = state.services.catalog.get_event(id).await?;
    Ok(Json(ApiResponse::success(ev)))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityView {
    pub available_tickets: i32,
}

/// Remaining sellable tickets for an event
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/availability",
    summary = "Get event availability",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Availability retrieved", body = crate::ApiResponse<AvailabilityView>),
        (status = 404, description = "Event not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::ApiResult<AvailabilityView> {
    let available_tickets = state.services.inventory.availability(id).await?;
    Ok(Json(ApiResponse::success(AvailabilityView {
        available_tickets,
    })))
}

/// Create an event (organizer)
#[utoipa::path(
    post,
    path = "/api/v1/events",
    summary = "Create event",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created successfully"),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventModel>>), ServiceError> {
    let ev = state
        .services
        .catalog
        .create_event(&auth_user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(ev))))
}

/// Update an event (owner or admin)
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    summary = "Update event",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated successfully"),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn update_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<ApiResponse<EventModel>>, ServiceError> {
    let ev = state
        .services
        .catalog
        .update_event(&auth_user, id, request)
        .await?;
    Ok(Json(ApiResponse::success(ev)))
}

/// Cancel an event (owner or admin)
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/cancel",
    summary = "Cancel event",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event cancelled"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn cancel_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventModel>>, ServiceError> {
    let ev = state.services.catalog.cancel_event(&auth_user, id).await?;
    Ok(Json(ApiResponse::success(ev)))
}

/// Delete a bookingless event (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    summary = "Delete event",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 400, description = "Event has bookings", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn delete_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.services.catalog.delete_event(&auth_user, id).await?;
    Ok(Json(ApiResponse::success(())))
}
