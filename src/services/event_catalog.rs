use crate::{
    db::DbPool,
    entities::booking::{self, Entity as BookingEntity},
    entities::event::{self, Entity as EventEntity, EventStatus, Model as EventModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub ticket_price: Decimal,
    #[validate(range(min = 1, message = "Total tickets must be at least 1"))]
    pub total_tickets: i32,
    pub image_url: Option<String>,
    /// Defaults to Published when omitted.
    #[schema(value_type = Option<String>)]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub ticket_price: Option<Decimal>,
    pub total_tickets: Option<i32>,
    pub image_url: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    /// Hide events that already ended. Defaults to true.
    pub upcoming_only: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct EventListView {
    pub events: Vec<EventModel>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

/// Organizer-facing catalog: event lifecycle and capacity management.
#[derive(Clone)]
pub struct EventCatalogService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl EventCatalogService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, request), fields(organizer_id = %auth.user_id))]
    pub async fn create_event(
        &self,
        auth: &AuthUser,
        request: CreateEventRequest,
    ) -> Result<EventModel, ServiceError> {
        request.validate().map_err(ServiceError::from)?;

        if !auth.is_organizer() && !auth.is_admin() {
            return Err(ServiceError::Forbidden(
                "Only organizers can create events".to_string(),
            ));
        }
        if request.end_time <= request.start_time {
            return Err(ServiceError::ValidationError(
                "end_time must be after start_time".to_string(),
            ));
        }
        if request.ticket_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "ticket_price must not be negative".to_string(),
            ));
        }

        let now = Utc::now();
        let model = event::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(request.title),
            description: Set(request.description),
            organizer_id: Set(auth.user_id),
            venue: Set(request.venue),
            category: Set(request.category),
            start_time: Set(request.start_time),
            end_time: Set(request.end_time),
            ticket_price: Set(request.ticket_price),
            total_tickets: Set(request.total_tickets),
            // New events start with full availability.
            available_tickets: Set(request.total_tickets),
            status: Set(request.status.unwrap_or(EventStatus::Published)),
            image_url: Set(request.image_url),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let ev = model.insert(&*self.db).await?;
        info!(event_id = %ev.id, "event created");

        if let Some(sender) = &self.event_sender {
            let _ = sender.send(Event::EventCreated(ev.id)).await;
        }

        Ok(ev)
    }

    /// Updates event details.
    ///
    /// Capacity edits keep the availability invariant: raising the total
    /// raises availability by the same delta; the total can never drop
    /// below tickets already sold.
    #[instrument(skip(self, request), fields(event_id = %event_id))]
    pub async fn update_event(
        &self,
        auth: &AuthUser,
        event_id: Uuid,
        request: UpdateEventRequest,
    ) -> Result<EventModel, ServiceError> {
        request.validate().map_err(ServiceError::from)?;

        let txn = self.db.begin().await?;

        let ev = EventEntity::find_by_id(event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Event {} not found", event_id)))?;

        authorize_event_access(auth, &ev)?;

        let start_time = request.start_time.unwrap_or(ev.start_time);
        let end_time = request.end_time.unwrap_or(ev.end_time);
        if end_time <= start_time {
            return Err(ServiceError::ValidationError(
                "end_time must be after start_time".to_string(),
            ));
        }

        let sold = ev.total_tickets - ev.available_tickets;
        let (total_tickets, available_tickets) = match request.total_tickets {
            Some(new_total) => {
                if new_total < sold {
                    return Err(ServiceError::ValidationError(format!(
                        "total_tickets cannot drop below {} tickets already sold",
                        sold
                    )));
                }
                (new_total, new_total - sold)
            }
            None => (ev.total_tickets, ev.available_tickets),
        };

        let mut active: event::ActiveModel = ev.into();
        if let Some(title) = request.title {
            active.title = Set(title);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(venue) = request.venue {
            active.venue = Set(Some(venue));
        }
        if let Some(category) = request.category {
            active.category = Set(Some(category));
        }
        if let Some(price) = request.ticket_price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "ticket_price must not be negative".to_string(),
                ));
            }
            active.ticket_price = Set(price);
        }
        if let Some(image_url) = request.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        active.start_time = Set(start_time);
        active.end_time = Set(end_time);
        active.total_tickets = Set(total_tickets);
        active.available_tickets = Set(available_tickets);
        active.updated_at = Set(Some(Utc::now()));

        let ev = active.update(&txn).await?;
        txn.commit().await?;

        info!(event_id = %ev.id, "event updated");

        if let Some(sender) = &self.event_sender {
            let _ = sender.send(Event::EventUpdated(ev.id)).await;
        }

        Ok(ev)
    }

    /// Cancels an event; existing bookings stay on record.
    #[instrument(skip(self))]
    pub async fn cancel_event(
        &self,
        auth: &AuthUser,
        event_id: Uuid,
    ) -> Result<EventModel, ServiceError> {
        let ev = EventEntity::find_by_id(event_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Event {} not found", event_id)))?;

        authorize_event_access(auth, &ev)?;

        let mut active: event::ActiveModel = ev.into();
        active.status = Set(EventStatus::Cancelled);
        active.updated_at = Set(Some(Utc::now()));
        let ev = active.update(&*self.db).await?;

        info!(event_id = %ev.id, "event cancelled");

        if let Some(sender) = &self.event_sender {
            let _ = sender.send(Event::EventCancelled(ev.id)).await;
        }

        Ok(ev)
    }

    /// Hard delete, allowed only while no bookings reference the event.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, auth: &AuthUser, event_id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let ev = EventEntity::find_by_id(event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Event {} not found", event_id)))?;

        authorize_event_access(auth, &ev)?;

        let bookings = BookingEntity::find()
            .filter(booking::Column::EventId.eq(event_id))
            .count(&txn)
            .await?;
        if bookings > 0 {
            return Err(ServiceError::InvalidOperation(
                "Cannot delete an event with existing bookings; cancel it instead".to_string(),
            ));
        }

        ev.delete(&txn).await?;
        txn.commit().await?;

        info!(%event_id, "event deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, event_id: Uuid) -> Result<EventModel, ServiceError> {
        EventEntity::find_by_id(event_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Event {} not found", event_id)))
    }

    /// Public browse surface: published events, optionally filtered.
    #[instrument(skip(self))]
    pub async fn list_events(&self, query: EventListQuery) -> Result<EventListView, ServiceError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).clamp(1, 100);

        let mut finder = EventEntity::find()
            .filter(event::Column::Status.eq(EventStatus::Published));

        if query.upcoming_only.unwrap_or(true) {
            finder = finder.filter(event::Column::EndTime.gte(Utc::now()));
        }
        if let Some(category) = &query.category {
            finder = finder.filter(event::Column::Category.eq(category.clone()));
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            finder = finder.filter(event::Column::Title.like(pattern));
        }

        let paginator = finder
            .order_by_asc(event::Column::StartTime)
            .paginate(&*self.db, limit);

        let total = paginator.num_items().await?;
        let events = paginator.fetch_page(page - 1).await?;

        Ok(EventListView {
            events,
            total,
            page,
            limit,
        })
    }
}

fn authorize_event_access(auth: &AuthUser, ev: &EventModel) -> Result<(), ServiceError> {
    let owns = auth.is_organizer() && ev.organizer_id == auth.user_id;
    if !owns && !auth.is_admin() {
        return Err(ServiceError::Forbidden(
            "Event belongs to another organizer".to_string(),
        ));
    }
    Ok(())
}
