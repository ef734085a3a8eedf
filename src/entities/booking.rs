use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

/// A customer's reservation of N tickets for one event, progressing
/// Pending -> Completed through payment confirmation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Sequential human-facing number; ticket and invoice codes derive
    /// from it.
    pub booking_number: i64,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub discount_applied: Decimal,
    pub promotion_id: Option<Uuid>,
    pub points_used: i64,
    pub final_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub booked_at: DateTime<Utc>,
    pub checked_in: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_completed(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::ticket::Entity")]
    Tickets,
    #[sea_orm(has_one = "super::payment::Entity")]
    Payment,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if !insert {
            if let ActiveValue::NotSet = active_model.updated_at {
                active_model.updated_at = Set(Some(Utc::now()));
            }
        }

        Ok(active_model)
    }
}
