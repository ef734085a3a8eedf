//! Concurrency test for the availability check + decrement serialization.
//!
//! Uses a file-backed SQLite database so multiple pooled connections see
//! the same data. Ignored by default: SQLite serializes writers coarsely;
//! run against Postgres for a faithful row-locking exercise.

mod common;

use common::{auth_for, TestHarness};
use eventsphere_api::entities::event::Entity as EventEntity;
use eventsphere_api::entities::user::Role;
use eventsphere_api::services::bookings::{ConfirmPaymentRequest, CreateBookingRequest};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

// Run with: cargo test -- --ignored concurrent_confirmations
#[tokio::test]
#[ignore = "requires a file-backed or Postgres database with true connection concurrency"]
async fn concurrent_confirmations_sell_each_ticket_once() {
    let db_file = std::env::temp_dir().join(format!("eventsphere-test-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite://{}?mode=rwc", db_file.display());
    let h = TestHarness::with_database_url(&url, 8).await;

    let organizer = h.seed_user("Org", Role::Organizer, 0).await;
    let ev = h.seed_event(&organizer, dec!(10), 5).await;

    // Two customers each hold a pending booking for the full capacity.
    let mut pending = Vec::new();
    for name in ["Alice", "Bob"] {
        let customer = h.seed_user(name, Role::Customer, 0).await;
        let booking = h
            .services
            .bookings
            .create_booking(
                &auth_for(&customer),
                CreateBookingRequest {
                    event_id: ev.id,
                    quantity: 5,
                },
            )
            .await
            .expect("pending booking");
        pending.push((customer, booking));
    }

    let mut tasks = Vec::new();
    for (customer, booking) in pending {
        let bookings = h.services.bookings.clone();
        let auth = auth_for(&customer);
        tasks.push(tokio::spawn(async move {
            bookings
                .confirm_payment(
                    &auth,
                    booking.id,
                    ConfirmPaymentRequest {
                        promo_code: None,
                        use_points: false,
                        payment_method: "card".to_string(),
                    },
                )
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for task in tasks {
        if task.await.unwrap_or(false) {
            successes += 1;
        }
    }

    assert_eq!(
        successes, 1,
        "exactly one concurrent confirmation should win"
    );

    let ev_row = EventEntity::find_by_id(ev.id)
        .one(&*h.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ev_row.available_tickets, 0);

    let _ = std::fs::remove_file(db_file);
}
