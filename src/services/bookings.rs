use crate::{
    db::DbPool,
    entities::booking::{self, Entity as BookingEntity, PaymentStatus},
    entities::event::{self as event_entity, Entity as EventEntity},
    entities::payment::{self, Entity as PaymentEntity},
    entities::ticket::{self, Entity as TicketEntity},
    entities::user::{Entity as UserEntity, Role},
    errors::ServiceError,
    events::{Event, EventSender},
    services::codes,
    services::inventory::InventoryService,
    services::loyalty::LoyaltyService,
    services::promotions::PromotionService,
    services::qr::{QrTicket, TicketQrIssuer},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub event_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConfirmPaymentRequest {
    /// Optional promotion code; empty string means none.
    pub promo_code: Option<String>,
    /// Redeem the customer's loyalty balance against this booking.
    #[serde(default)]
    pub use_points: bool,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketView {
    pub id: Uuid,
    pub ticket_number: String,
    pub qr_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentView {
    pub reference_number: String,
    pub invoice_number: String,
    pub method: String,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

/// Snapshot of a booking after creation or confirmation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingView {
    pub id: Uuid,
    pub booking_number: i64,
    pub event_id: Uuid,
    pub event_title: String,
    pub event_start: DateTime<Utc>,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub discount_applied: Decimal,
    pub points_used: i64,
    pub points_earned: i64,
    pub final_amount: Decimal,
    #[schema(value_type = String)]
    pub payment_status: PaymentStatus,
    pub checked_in: bool,
    pub booked_at: DateTime<Utc>,
    pub tickets: Vec<TicketView>,
    pub payment: Option<PaymentView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyBookingsView {
    pub bookings: Vec<BookingView>,
    /// Sum of booking totals across completed payments.
    pub total_spent: Decimal,
}

/// Orchestrates the booking/payment flow: reservation, promotion and
/// loyalty adjustments, payment finalization, inventory decrement, ticket
/// issuance, and point accrual.
#[derive(Clone)]
pub struct BookingService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    qr_issuer: Arc<dyn TicketQrIssuer>,
}

impl BookingService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        qr_issuer: Arc<dyn TicketQrIssuer>,
    ) -> Self {
        Self {
            db,
            event_sender,
            qr_issuer,
        }
    }

    /// Creates a Pending booking with ticket placeholders.
    ///
    /// Availability is checked but not reserved; inventory is only claimed
    /// when the payment is confirmed.
    #[instrument(skip(self, request), fields(event_id = %request.event_id, user_id = %auth.user_id))]
    pub async fn create_booking(
        &self,
        auth: &AuthUser,
        request: CreateBookingRequest,
    ) -> Result<BookingView, ServiceError> {
        request.validate().map_err(ServiceError::from)?;

        if !auth.is_customer() {
            return Err(ServiceError::Forbidden(
                "Only customers can book events".to_string(),
            ));
        }

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let ev = EventEntity::find_by_id(request.event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Event {} not found", request.event_id))
            })?;

        if ev.has_ended(now) {
            return Err(ServiceError::EventEnded(format!(
                "{} ended on {}",
                ev.title, ev.end_time
            )));
        }
        if !ev.is_bookable(now) {
            return Err(ServiceError::InvalidOperation(format!(
                "{} is not open for booking",
                ev.title
            )));
        }
        if ev.available_tickets < request.quantity {
            return Err(ServiceError::InsufficientInventory(format!(
                "Only {} tickets are remaining",
                ev.available_tickets
            )));
        }

        let booking_number = next_booking_number(&txn).await?;
        let booking_id = Uuid::new_v4();
        let total_amount = ev.ticket_price * Decimal::from(request.quantity);

        let booking_model = booking::ActiveModel {
            id: Set(booking_id),
            booking_number: Set(booking_number),
            event_id: Set(ev.id),
            user_id: Set(auth.user_id),
            quantity: Set(request.quantity),
            total_amount: Set(total_amount),
            discount_applied: Set(Decimal::ZERO),
            promotion_id: Set(None),
            points_used: Set(0),
            final_amount: Set(total_amount),
            payment_status: Set(PaymentStatus::Pending),
            payment_method: Set(None),
            booked_at: Set(now),
            checked_in: Set(false),
            updated_at: Set(None),
        };
        let booking_row = booking_model.insert(&txn).await?;

        // Ticket placeholders; QR references arrive with payment.
        let mut tickets = Vec::with_capacity(request.quantity as usize);
        for sequence in 1..=request.quantity as u32 {
            let ticket_model = ticket::ActiveModel {
                id: Set(Uuid::new_v4()),
                booking_id: Set(booking_id),
                ticket_number: Set(codes::ticket_number(now, booking_number, sequence)),
                qr_code: Set(None),
                issued_at: Set(now),
            };
            tickets.push(ticket_model.insert(&txn).await?);
        }

        txn.commit().await?;

        info!(booking_id = %booking_id, booking_number, "booking created");

        if let Some(sender) = &self.event_sender {
            let _ = sender
                .send(Event::BookingCreated {
                    booking_id,
                    event_id: ev.id,
                    user_id: auth.user_id,
                    quantity: request.quantity,
                })
                .await;
        }

        Ok(booking_view(booking_row, &ev, tickets, None, 0))
    }

    /// Finalizes payment for a booking.
    ///
    /// Idempotent: confirming an already-Completed booking returns the
    /// stored receipt without side effects. Otherwise every step (inventory
    /// claim, promotion, loyalty redeem/earn, payment row, QR issuance,
    /// booking flip) commits atomically or not at all.
    #[instrument(skip(self, request), fields(booking_id = %booking_id, user_id = %auth.user_id))]
    pub async fn confirm_payment(
        &self,
        auth: &AuthUser,
        booking_id: Uuid,
        request: ConfirmPaymentRequest,
    ) -> Result<BookingView, ServiceError> {
        request.validate().map_err(ServiceError::from)?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let booking_row = BookingEntity::find_by_id(booking_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Booking {} not found", booking_id)))?;

        if booking_row.user_id != auth.user_id && !auth.is_admin() {
            return Err(ServiceError::Forbidden(
                "Booking belongs to another customer".to_string(),
            ));
        }

        let ev = EventEntity::find_by_id(booking_row.event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Event {} not found", booking_row.event_id))
            })?;

        if booking_row.is_completed() {
            let view = load_completed_view(&txn, booking_row, &ev).await?;
            txn.commit().await?;
            return Ok(view);
        }

        let user = UserEntity::find_by_id(booking_row.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("User {} not found", booking_row.user_id))
            })?;

        // Second availability check; the conditional decrement below is the
        // authoritative one.
        if ev.available_tickets < booking_row.quantity {
            return Err(ServiceError::InsufficientInventory(format!(
                "Not enough tickets available. Remaining: {}",
                ev.available_tickets
            )));
        }

        let total = booking_row.total_amount;
        let mut discount = Decimal::ZERO;
        let mut promotion_id = None;

        let promo_code = request
            .promo_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());
        if let Some(code) = promo_code {
            let promo = PromotionService::resolve(&txn, code, now)
                .await?
                .ok_or_else(|| {
                    ServiceError::InvalidPromotion(
                        "Invalid or expired promotion code".to_string(),
                    )
                })?;
            discount = PromotionService::calculate_discount(&promo, total);
            promotion_id = Some(promo.id);
        }

        let mut points_used = 0;
        if request.use_points && user.loyalty_points > 0 {
            let payable = total - discount;
            points_used = LoyaltyService::redeem(
                &txn,
                &user,
                booking_row.id,
                booking_row.booking_number,
                payable,
            )
            .await?;
        }

        // The redeem cap keeps this non-negative; clamp anyway.
        let final_amount = (total - discount - Decimal::from(points_used)).max(Decimal::ZERO);

        // Atomic conditional decrement serializes concurrent confirmations
        // on the event row.
        InventoryService::decrement(&txn, ev.id, booking_row.quantity).await?;

        let reference_number = codes::reference_number(now);
        let invoice_number = codes::invoice_number(now, booking_row.booking_number);
        let payment_model = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            booking_id: Set(booking_row.id),
            amount: Set(final_amount),
            status: Set("Completed".to_string()),
            method: Set(request.payment_method.clone()),
            reference_number: Set(reference_number.clone()),
            invoice_number: Set(invoice_number),
            paid_at: Set(now),
        };
        let payment_row = payment_model.insert(&txn).await?;

        let ticket_rows = tickets_for_booking(&txn, booking_row.id).await?;
        let mut issued = Vec::with_capacity(ticket_rows.len());
        for ticket_row in ticket_rows {
            let reference = self.qr_issuer.issue(&QrTicket {
                ticket_number: &ticket_row.ticket_number,
                booking_number: booking_row.booking_number,
                event_title: &ev.title,
                customer_name: &user.full_name,
                event_start: ev.start_time,
            })?;

            let mut active: ticket::ActiveModel = ticket_row.into();
            active.qr_code = Set(Some(reference));
            issued.push(active.update(&txn).await?);
        }

        let earned = LoyaltyService::earned_for_amount(final_amount);
        if earned > 0 {
            LoyaltyService::earn(
                &txn,
                user.id,
                booking_row.id,
                booking_row.booking_number,
                earned,
            )
            .await?;
        }

        let mut booking_update: booking::ActiveModel = booking_row.into();
        booking_update.discount_applied = Set(discount);
        booking_update.promotion_id = Set(promotion_id);
        booking_update.points_used = Set(points_used);
        booking_update.final_amount = Set(final_amount);
        booking_update.payment_status = Set(PaymentStatus::Completed);
        booking_update.payment_method = Set(Some(request.payment_method));
        booking_update.updated_at = Set(Some(now));
        let booking_row = booking_update.update(&txn).await?;

        txn.commit().await?;

        info!(
            booking_id = %booking_row.id,
            %final_amount,
            points_used,
            earned,
            "payment confirmed"
        );

        if let Some(sender) = &self.event_sender {
            let _ = sender
                .send(Event::PaymentCompleted {
                    booking_id: booking_row.id,
                    amount: final_amount,
                    reference_number,
                })
                .await;
            let _ = sender
                .send(Event::TicketsIssued {
                    booking_id: booking_row.id,
                    count: issued.len(),
                })
                .await;
            let _ = sender
                .send(Event::InventoryDecremented {
                    event_id: ev.id,
                    quantity: booking_row.quantity,
                })
                .await;
            if points_used > 0 {
                let _ = sender
                    .send(Event::LoyaltyPointsRedeemed {
                        user_id: user.id,
                        booking_id: booking_row.id,
                        points: points_used,
                    })
                    .await;
            }
            if earned > 0 {
                let _ = sender
                    .send(Event::LoyaltyPointsEarned {
                        user_id: user.id,
                        booking_id: booking_row.id,
                        points: earned,
                    })
                    .await;
            }
        }

        Ok(booking_view(
            booking_row,
            &ev,
            issued,
            Some(payment_row),
            earned,
        ))
    }

    /// Booking detail visible to the owner, the event's organizer, or an
    /// admin.
    #[instrument(skip(self))]
    pub async fn get_booking(
        &self,
        auth: &AuthUser,
        booking_id: Uuid,
    ) -> Result<BookingView, ServiceError> {
        let db = &*self.db;

        let booking_row = BookingEntity::find_by_id(booking_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Booking {} not found", booking_id)))?;

        let ev = EventEntity::find_by_id(booking_row.event_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Event {} not found", booking_row.event_id))
            })?;

        let is_owner = booking_row.user_id == auth.user_id;
        let is_event_organizer = auth.role == Role::Organizer && ev.organizer_id == auth.user_id;
        if !is_owner && !is_event_organizer && !auth.is_admin() {
            return Err(ServiceError::Forbidden(
                "Not allowed to view this booking".to_string(),
            ));
        }

        load_completed_view(db, booking_row, &ev).await
    }

    /// The customer's bookings, newest first, with total spend across
    /// completed payments.
    #[instrument(skip(self))]
    pub async fn list_my_bookings(&self, auth: &AuthUser) -> Result<MyBookingsView, ServiceError> {
        let db = &*self.db;

        let rows = BookingEntity::find()
            .filter(booking::Column::UserId.eq(auth.user_id))
            .order_by_desc(booking::Column::BookedAt)
            .all(db)
            .await?;

        let total_spent = rows
            .iter()
            .filter(|b| b.is_completed())
            .map(|b| b.total_amount)
            .sum::<Decimal>();

        let mut bookings = Vec::with_capacity(rows.len());
        for row in rows {
            let ev = EventEntity::find_by_id(row.event_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Event {} not found", row.event_id))
                })?;
            bookings.push(load_completed_view(db, row, &ev).await?);
        }

        Ok(MyBookingsView {
            bookings,
            total_spent,
        })
    }

    /// Marks a completed booking as checked in, exactly once.
    #[instrument(skip(self))]
    pub async fn check_in(
        &self,
        auth: &AuthUser,
        booking_id: Uuid,
    ) -> Result<BookingView, ServiceError> {
        let txn = self.db.begin().await?;

        let booking_row = BookingEntity::find_by_id(booking_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Booking {} not found", booking_id)))?;

        let ev = EventEntity::find_by_id(booking_row.event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Event {} not found", booking_row.event_id))
            })?;

        let is_event_organizer = auth.role == Role::Organizer && ev.organizer_id == auth.user_id;
        if !is_event_organizer && !auth.is_admin() {
            return Err(ServiceError::Forbidden(
                "Only the event organizer can check in bookings".to_string(),
            ));
        }

        if !booking_row.is_completed() {
            return Err(ServiceError::InvalidOperation(
                "Cannot check in an unpaid booking".to_string(),
            ));
        }
        if booking_row.checked_in {
            return Err(ServiceError::InvalidOperation(
                "Booking is already checked in".to_string(),
            ));
        }

        let mut active: booking::ActiveModel = booking_row.into();
        active.checked_in = Set(true);
        active.updated_at = Set(Some(Utc::now()));
        let booking_row = active.update(&txn).await?;

        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            let _ = sender.send(Event::BookingCheckedIn(booking_id)).await;
        }

        load_completed_view(&*self.db, booking_row, &ev).await
    }
}

/// Next value of the sequential booking number, scoped to the caller's
/// transaction. The unique index on the column turns a lost race into a
/// constraint violation rather than a duplicate.
async fn next_booking_number<C: ConnectionTrait>(conn: &C) -> Result<i64, ServiceError> {
    let max: Option<Option<i64>> = BookingEntity::find()
        .select_only()
        .column_as(booking::Column::BookingNumber.max(), "max_booking_number")
        .into_tuple()
        .one(conn)
        .await?;

    Ok(max.flatten().unwrap_or(0) + 1)
}

async fn tickets_for_booking<C: ConnectionTrait>(
    conn: &C,
    booking_id: Uuid,
) -> Result<Vec<ticket::Model>, ServiceError> {
    let tickets = TicketEntity::find()
        .filter(ticket::Column::BookingId.eq(booking_id))
        .order_by_asc(ticket::Column::TicketNumber)
        .all(conn)
        .await?;

    Ok(tickets)
}

/// Builds a booking view from persisted state, including whatever payment
/// and earn records exist.
async fn load_completed_view<C: ConnectionTrait>(
    conn: &C,
    booking_row: booking::Model,
    ev: &event_entity::Model,
) -> Result<BookingView, ServiceError> {
    let tickets = tickets_for_booking(conn, booking_row.id).await?;

    let payment_row = PaymentEntity::find()
        .filter(payment::Column::BookingId.eq(booking_row.id))
        .one(conn)
        .await?;

    let points_earned = LoyaltyService::earned_for_booking(conn, booking_row.id).await?;

    Ok(booking_view(
        booking_row,
        ev,
        tickets,
        payment_row,
        points_earned,
    ))
}

fn booking_view(
    booking_row: booking::Model,
    ev: &event_entity::Model,
    tickets: Vec<ticket::Model>,
    payment_row: Option<payment::Model>,
    points_earned: i64,
) -> BookingView {
    BookingView {
        id: booking_row.id,
        booking_number: booking_row.booking_number,
        event_id: ev.id,
        event_title: ev.title.clone(),
        event_start: ev.start_time,
        quantity: booking_row.quantity,
        total_amount: booking_row.total_amount,
        discount_applied: booking_row.discount_applied,
        points_used: booking_row.points_used,
        points_earned,
        final_amount: booking_row.final_amount,
        payment_status: booking_row.payment_status,
        checked_in: booking_row.checked_in,
        booked_at: booking_row.booked_at,
        tickets: tickets
            .into_iter()
            .map(|t| TicketView {
                id: t.id,
                ticket_number: t.ticket_number,
                qr_code: t.qr_code,
            })
            .collect(),
        payment: payment_row.map(|p| PaymentView {
            reference_number: p.reference_number,
            invoice_number: p.invoice_number,
            method: p.method,
            amount: p.amount,
            paid_at: p.paid_at,
        }),
    }
}
