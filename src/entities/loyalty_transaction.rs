use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum LoyaltyTransactionKind {
    #[sea_orm(string_value = "Earn")]
    Earn,
    #[sea_orm(string_value = "Redeem")]
    Redeem,
}

/// Append-only audit record of loyalty point movements. The sum of `points`
/// per user must reconcile with the user's current balance.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loyalty_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_id: Uuid,
    /// Signed delta: positive for Earn, negative for Redeem.
    pub points: i64,
    pub kind: LoyaltyTransactionKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn is_earn(&self) -> bool {
        self.kind == LoyaltyTransactionKind::Earn
    }

    pub fn is_redeem(&self) -> bool {
        self.kind == LoyaltyTransactionKind::Redeem
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
