use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;

use crate::auth::AuthUser;
use crate::entities::promotion::Model as PromotionModel;
use crate::errors::ServiceError;
use crate::services::promotions::CreatePromotionRequest;
use crate::{ApiResponse, AppState};

/// Promotions currently usable at checkout
#[utoipa::path(
    get,
    path = "/api/v1/promotions/active",
    summary = "List active promotions",
    responses(
        (status = 200, description = "Active promotions retrieved"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_active(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<PromotionModel>>>, ServiceError> {
    let promotions = state.services.promotions.list_active(Utc::now()).await?;
    Ok(Json(ApiResponse::success(promotions)))
}

/// Create a promotion (admin)
#[utoipa::path(
    post,
    path = "/api/v1/promotions",
    summary = "Create promotion",
    request_body = CreatePromotionRequest,
    responses(
        (status = 201, description = "Promotion created"),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_promotion(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreatePromotionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PromotionModel>>), ServiceError> {
    if !auth_user.is_admin() {
        return Err(ServiceError::Forbidden(
            "Only admins can create promotions".to_string(),
        ));
    }

    let promotion = state.services.promotions.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(promotion))))
}
