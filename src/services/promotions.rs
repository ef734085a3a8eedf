use crate::{
    db::DbPool,
    entities::promotion::{self, Entity as PromotionEntity, Model as PromotionModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePromotionRequest {
    #[validate(length(min = 3, max = 32, message = "Code must be between 3 and 32 characters"))]
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PromotionService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl PromotionService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Resolves a code to a usable promotion on the given connection.
    ///
    /// Matching is exact and case-sensitive; the promotion must be active
    /// and `now` must fall inside its validity window. Runs against the
    /// caller's connection so payment confirmation can resolve inside its
    /// own transaction.
    pub async fn resolve<C: ConnectionTrait>(
        conn: &C,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PromotionModel>, ServiceError> {
        let promotion = PromotionEntity::find()
            .filter(promotion::Column::Code.eq(code))
            .filter(promotion::Column::Active.eq(true))
            .filter(promotion::Column::StartsAt.lte(now))
            .filter(promotion::Column::EndsAt.gte(now))
            .one(conn)
            .await?;

        Ok(promotion)
    }

    /// Percentage discount on a booking total. At most one promotion per
    /// booking; no stacking.
    pub fn calculate_discount(promotion: &PromotionModel, total: Decimal) -> Decimal {
        (total * promotion.discount_percent / Decimal::from(100)).round_dp(2)
    }

    /// Promotions currently usable, soonest-ending first.
    #[instrument(skip(self))]
    pub async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<PromotionModel>, ServiceError> {
        let promotions = PromotionEntity::find()
            .filter(promotion::Column::Active.eq(true))
            .filter(promotion::Column::StartsAt.lte(now))
            .filter(promotion::Column::EndsAt.gte(now))
            .order_by_asc(promotion::Column::EndsAt)
            .all(&*self.db)
            .await?;

        Ok(promotions)
    }

    #[instrument(skip(self, request), fields(code = %request.code))]
    pub async fn create(
        &self,
        request: CreatePromotionRequest,
    ) -> Result<PromotionModel, ServiceError> {
        request.validate().map_err(ServiceError::from)?;

        if request.discount_percent <= Decimal::ZERO || request.discount_percent > Decimal::from(100)
        {
            return Err(ServiceError::ValidationError(
                "discount_percent must be in (0, 100]".to_string(),
            ));
        }
        if request.ends_at <= request.starts_at {
            return Err(ServiceError::ValidationError(
                "ends_at must be after starts_at".to_string(),
            ));
        }

        let existing = PromotionEntity::find()
            .filter(promotion::Column::Code.eq(request.code.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::InvalidOperation(format!(
                "Promotion code {} already exists",
                request.code
            )));
        }

        let model = promotion::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(request.code),
            description: Set(request.description),
            discount_percent: Set(request.discount_percent),
            active: Set(true),
            starts_at: Set(request.starts_at),
            ends_at: Set(request.ends_at),
            created_at: Set(Utc::now()),
        };

        let promotion = model.insert(&*self.db).await?;
        info!(promotion_id = %promotion.id, "promotion created");

        if let Some(sender) = &self.event_sender {
            let _ = sender.send(Event::PromotionCreated(promotion.id)).await;
        }

        Ok(promotion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn promotion(percent: Decimal) -> PromotionModel {
        let now = Utc::now();
        PromotionModel {
            id: Uuid::new_v4(),
            code: "SAVE10".to_string(),
            description: None,
            discount_percent: percent,
            active: true,
            starts_at: now - chrono::Duration::days(1),
            ends_at: now + chrono::Duration::days(30),
            created_at: now,
        }
    }

    #[test]
    fn ten_percent_of_one_thousand_is_one_hundred() {
        let promo = promotion(dec!(10));
        assert_eq!(
            PromotionService::calculate_discount(&promo, dec!(1000)),
            dec!(100)
        );
    }

    #[test]
    fn discounts_round_to_cents() {
        let promo = promotion(dec!(12.5));
        assert_eq!(
            PromotionService::calculate_discount(&promo, dec!(99.99)),
            dec!(12.50)
        );
    }

    #[test]
    fn validity_window_is_inclusive() {
        let promo = promotion(dec!(10));
        assert!(promo.is_valid_at(promo.starts_at));
        assert!(promo.is_valid_at(promo.ends_at));
        assert!(!promo.is_valid_at(promo.ends_at + chrono::Duration::seconds(1)));
    }
}
