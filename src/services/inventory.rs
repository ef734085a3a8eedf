use crate::{
    db::DbPool,
    entities::event::{self, Entity as EventEntity},
    errors::ServiceError,
};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Ledger over `events.available_tickets`, the one consistency-sensitive
/// shared counter in the system.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Remaining sellable tickets for an event.
    #[instrument(skip(self))]
    pub async fn availability(&self, event_id: Uuid) -> Result<i32, ServiceError> {
        let ev = EventEntity::find_by_id(event_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Event {} not found", event_id)))?;

        Ok(ev.available_tickets)
    }

    /// Atomically claims `quantity` tickets within the caller's transaction.
    ///
    /// Runs a single conditional UPDATE (`available = available - q WHERE
    /// available >= q`), so concurrent confirmations against the same event
    /// serialize on the row instead of racing a read-then-write.
    pub async fn decrement<C: ConnectionTrait>(
        conn: &C,
        event_id: Uuid,
        quantity: i32,
    ) -> Result<(), ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "quantity must be positive".to_string(),
            ));
        }

        let result = EventEntity::update_many()
            .col_expr(
                event::Column::AvailableTickets,
                Expr::col(event::Column::AvailableTickets).sub(quantity),
            )
            .filter(event::Column::Id.eq(event_id))
            .filter(event::Column::AvailableTickets.gte(quantity))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::InsufficientInventory(format!(
                "Not enough tickets available for event {}",
                event_id
            )));
        }

        Ok(())
    }
}
