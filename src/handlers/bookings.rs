use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::bookings::{
    BookingView, ConfirmPaymentRequest, CreateBookingRequest, MyBookingsView,
};
use crate::{ApiResponse, AppState};

/// Reserve tickets for an event (customer)
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    summary = "Create booking",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created with pending payment", body = ApiResponse<BookingView>),
        (status = 400, description = "Invalid request or event ended", body = crate::errors::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Insufficient inventory", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_booking(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingView>>), ServiceError> {
    let booking = state
        .services
        .bookings
        .create_booking(&auth_user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking))))
}

/// Confirm payment for a booking
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/payment",
    summary = "Confirm payment",
    description = "Applies promotion and loyalty adjustments, finalizes the payment, decrements \
                   inventory, and issues QR-coded tickets. Idempotent for completed bookings.",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment confirmed; receipt returned", body = ApiResponse<BookingView>),
        (status = 400, description = "Invalid promotion or request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Insufficient inventory", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<ApiResponse<BookingView>>, ServiceError> {
    let receipt = state
        .services
        .bookings
        .confirm_payment(&auth_user, id, request)
        .await?;
    Ok(Json(ApiResponse::success(receipt)))
}

/// Booking detail / receipt
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    summary = "Get booking",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking retrieved", body = ApiResponse<BookingView>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_booking(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingView>>, ServiceError> {
    let booking = state.services.bookings.get_booking(&auth_user, id).await?;
    Ok(Json(ApiResponse::success(booking)))
}

/// The caller's bookings, newest first
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    summary = "List my bookings",
    responses(
        (status = 200, description = "Bookings retrieved", body = ApiResponse<MyBookingsView>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_my_bookings(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<MyBookingsView>>, ServiceError> {
    let bookings = state.services.bookings.list_my_bookings(&auth_user).await?;
    Ok(Json(ApiResponse::success(bookings)))
}

/// Check in a completed booking (organizer or admin)
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/check-in",
    summary = "Check in booking",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking checked in", body = ApiResponse<BookingView>),
        (status = 400, description = "Booking unpaid or already checked in", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn check_in(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingView>>, ServiceError> {
    let booking = state.services.bookings.check_in(&auth_user, id).await?;
    Ok(Json(ApiResponse::success(booking)))
}
