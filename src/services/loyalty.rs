use crate::{
    db::DbPool,
    entities::loyalty_transaction::{
        self, Entity as LoyaltyTransactionEntity, LoyaltyTransactionKind,
        Model as LoyaltyTransactionModel,
    },
    entities::user::{self, Entity as UserEntity},
    errors::ServiceError,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Ledger over `users.loyalty_points`. Points are currency-equivalent 1:1.
///
/// Balance mutations are conditional single-statement updates executed on
/// the caller's transaction, so a booking confirmation and its point
/// movements commit or roll back together and concurrent bookings by the
/// same user cannot lose updates.
#[derive(Clone)]
pub struct LoyaltyService {
    db: Arc<DbPool>,
}

impl LoyaltyService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Redeems up to `payable` worth of points against a booking.
    ///
    /// Uses `min(balance, floor(payable))`, so the balance never goes
    /// negative and the booking is never overpaid. Returns the points
    /// actually redeemed (possibly zero).
    pub async fn redeem<C: ConnectionTrait>(
        conn: &C,
        user: &user::Model,
        booking_id: Uuid,
        booking_number: i64,
        payable: Decimal,
    ) -> Result<i64, ServiceError> {
        let points = Self::redeemable_points(user.loyalty_points, payable);
        if points <= 0 {
            return Ok(0);
        }

        let result = UserEntity::update_many()
            .col_expr(
                user::Column::LoyaltyPoints,
                Expr::col(user::Column::LoyaltyPoints).sub(points),
            )
            .filter(user::Column::Id.eq(user.id))
            .filter(user::Column::LoyaltyPoints.gte(points))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::InvalidOperation(
                "Loyalty balance changed during payment".to_string(),
            ));
        }

        let audit = loyalty_transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            booking_id: Set(booking_id),
            points: Set(-points),
            kind: Set(LoyaltyTransactionKind::Redeem),
            description: Set(format!(
                "Redeemed {} points for booking {}",
                points, booking_number
            )),
            created_at: Set(chrono::Utc::now()),
        };
        audit.insert(conn).await?;

        Ok(points)
    }

    /// Credits earned points to a user within the caller's transaction.
    pub async fn earn<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        booking_id: Uuid,
        booking_number: i64,
        points: i64,
    ) -> Result<(), ServiceError> {
        if points <= 0 {
            return Err(ServiceError::ValidationError(
                "earned points must be positive".to_string(),
            ));
        }

        let result = UserEntity::update_many()
            .col_expr(
                user::Column::LoyaltyPoints,
                Expr::col(user::Column::LoyaltyPoints).add(points),
            )
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("User {} not found", user_id)));
        }

        let audit = loyalty_transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            booking_id: Set(booking_id),
            points: Set(points),
            kind: Set(LoyaltyTransactionKind::Earn),
            description: Set(format!(
                "Earned {} points from booking {}",
                points, booking_number
            )),
            created_at: Set(chrono::Utc::now()),
        };
        audit.insert(conn).await?;

        Ok(())
    }

    /// How many points a balance can cover for a payable amount:
    /// `min(balance, floor(payable))`, never negative.
    pub fn redeemable_points(balance: i64, payable: Decimal) -> i64 {
        let cap = payable.floor().to_i64().unwrap_or(0).max(0);
        balance.min(cap).max(0)
    }

    /// Points earned on completed payments: floor(final_amount * 5%).
    pub fn earned_for_amount(final_amount: Decimal) -> i64 {
        (final_amount * Decimal::new(5, 2))
            .floor()
            .to_i64()
            .unwrap_or(0)
    }

    #[instrument(skip(self))]
    pub async fn balance(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        Ok(user.loyalty_points)
    }

    /// Audit trail for a user, newest first.
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<LoyaltyTransactionModel>, ServiceError> {
        let entries = LoyaltyTransactionEntity::find()
            .filter(loyalty_transaction::Column::UserId.eq(user_id))
            .order_by_desc(loyalty_transaction::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(entries)
    }

    /// Points credited for a specific booking, if any. Used to rebuild
    /// receipts for already-completed bookings.
    pub async fn earned_for_booking<C: ConnectionTrait>(
        conn: &C,
        booking_id: Uuid,
    ) -> Result<i64, ServiceError> {
        let earn = LoyaltyTransactionEntity::find()
            .filter(loyalty_transaction::Column::BookingId.eq(booking_id))
            .filter(loyalty_transaction::Column::Kind.eq(LoyaltyTransactionKind::Earn))
            .one(conn)
            .await?;

        Ok(earn.map(|e| e.points).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn redeemable_points_cap_at_balance_and_payable() {
        assert_eq!(LoyaltyService::redeemable_points(200, dec!(900)), 200);
        assert_eq!(LoyaltyService::redeemable_points(500, dec!(120.75)), 120);
        assert_eq!(LoyaltyService::redeemable_points(0, dec!(100)), 0);
        assert_eq!(LoyaltyService::redeemable_points(50, dec!(-10)), 0);
    }

    #[test]
    fn five_percent_earn_rate_floors() {
        assert_eq!(LoyaltyService::earned_for_amount(dec!(700)), 35);
        assert_eq!(LoyaltyService::earned_for_amount(dec!(19.99)), 0);
        assert_eq!(LoyaltyService::earned_for_amount(dec!(20)), 1);
        assert_eq!(LoyaltyService::earned_for_amount(dec!(0)), 0);
    }
}
