use axum::{extract::State, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::entities::loyalty_transaction::Model as LoyaltyTransactionModel;
use crate::errors::ServiceError;
use crate::{ApiResponse, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct LoyaltyBalanceView {
    pub balance: i64,
}

/// The caller's loyalty point balance
#[utoipa::path(
    get,
    path = "/api/v1/loyalty/balance",
    summary = "Get loyalty balance",
    responses(
        (status = 200, description = "Balance retrieved", body = ApiResponse<LoyaltyBalanceView>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_balance(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<LoyaltyBalanceView>>, ServiceError> {
    let balance = state.services.loyalty.balance(auth_user.user_id).await?;
    Ok(Json(ApiResponse::success(LoyaltyBalanceView { balance })))
}

/// The caller's loyalty audit trail, newest first
#[utoipa::path(
    get,
    path = "/api/v1/loyalty/history",
    summary = "Get loyalty history",
    responses(
        (status = 200, description = "History retrieved"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_history(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<LoyaltyTransactionModel>>>, ServiceError> {
    let history = state.services.loyalty.history(auth_user.user_id).await?;
    Ok(Json(ApiResponse::success(history)))
}
