use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Domain events emitted after a transaction commits. Consumers must treat
/// them as notifications, never as the system of record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Catalog events
    EventCreated(Uuid),
    EventUpdated(Uuid),
    EventCancelled(Uuid),

    // Booking events
    BookingCreated {
        booking_id: Uuid,
        event_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    },
    PaymentCompleted {
        booking_id: Uuid,
        amount: Decimal,
        reference_number: String,
    },
    TicketsIssued {
        booking_id: Uuid,
        count: usize,
    },
    BookingCheckedIn(Uuid),

    // Inventory events
    InventoryDecremented {
        event_id: Uuid,
        quantity: i32,
    },

    // Loyalty events
    LoyaltyPointsRedeemed {
        user_id: Uuid,
        booking_id: Uuid,
        points: i64,
    },
    LoyaltyPointsEarned {
        user_id: Uuid,
        booking_id: Uuid,
        points: i64,
    },

    // Promotion events
    PromotionCreated(Uuid),

    // Generic event for custom messages
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn with_data(message: String) -> Self {
        Event::Generic {
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Consumes the event channel and logs every notification. Downstream
/// integrations (mail, exports, webhooks) hang off this loop.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::BookingCreated {
                booking_id,
                event_id,
                quantity,
                ..
            } => {
                info!(%booking_id, %event_id, quantity, "booking created");
            }
            Event::PaymentCompleted {
                booking_id,
                amount,
                reference_number,
            } => {
                info!(%booking_id, %amount, %reference_number, "payment completed");
            }
            Event::TicketsIssued { booking_id, count } => {
                info!(%booking_id, count, "tickets issued");
            }
            Event::InventoryDecremented { event_id, quantity } => {
                info!(%event_id, quantity, "inventory decremented");
            }
            Event::LoyaltyPointsRedeemed {
                user_id, points, ..
            } => {
                info!(%user_id, points, "loyalty points redeemed");
            }
            Event::LoyaltyPointsEarned {
                user_id, points, ..
            } => {
                info!(%user_id, points, "loyalty points earned");
            }
            other => {
                info!(event = ?other, "domain event");
            }
        }
    }

    info!("Event processing loop stopped");
}
