//! Tests for the organizer-facing catalog: lifecycle, capacity edits, and
//! the availability invariant.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::{auth_for, TestHarness};
use eventsphere_api::{
    entities::event::EventStatus,
    entities::user::Role,
    errors::ServiceError,
    services::bookings::{ConfirmPaymentRequest, CreateBookingRequest},
    services::event_catalog::{CreateEventRequest, EventListQuery, UpdateEventRequest},
};
use rust_decimal_macros::dec;

fn create_request(title: &str, total: i32) -> CreateEventRequest {
    let now = Utc::now();
    CreateEventRequest {
        title: title.to_string(),
        description: None,
        venue: Some("Hall A".to_string()),
        category: Some("Music".to_string()),
        start_time: now + Duration::days(10),
        end_time: now + Duration::days(11),
        ticket_price: dec!(45),
        total_tickets: total,
        image_url: None,
        status: None,
    }
}

fn update_request() -> UpdateEventRequest {
    UpdateEventRequest {
        title: None,
        description: None,
        venue: None,
        category: None,
        start_time: None,
        end_time: None,
        ticket_price: None,
        total_tickets: None,
        image_url: None,
        status: None,
    }
}

#[tokio::test]
async fn created_events_start_with_full_availability() {
    let h = TestHarness::new().await;
    let organizer = h.seed_user("Org", Role::Organizer, 0).await;

    let ev = h
        .services
        .catalog
        .create_event(&auth_for(&organizer), create_request("Jazz Night", 120))
        .await
        .unwrap();

    assert_eq!(ev.total_tickets, 120);
    assert_eq!(ev.available_tickets, 120);
    assert_eq!(ev.status, EventStatus::Published);
    assert_eq!(ev.organizer_id, organizer.id);
}

#[tokio::test]
async fn customers_cannot_create_events() {
    let h = TestHarness::new().await;
    let customer = h.seed_user("Cust", Role::Customer, 0).await;

    let result = h
        .services
        .catalog
        .create_event(&auth_for(&customer), create_request("Nope", 10))
        .await;
    assert_matches!(result, Err(ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn capacity_edits_preserve_the_sold_count() {
    let h = TestHarness::new().await;
    let organizer = h.seed_user("Org", Role::Organizer, 0).await;
    let customer = h.seed_user("Cust", Role::Customer, 0).await;
    let ev = h.seed_event(&organizer, dec!(10), 10).await;
    let auth = auth_for(&customer);

    // Sell 4 tickets.
    let booking = h
        .services
        .bookings
        .create_booking(
            &auth,
            CreateBookingRequest {
                event_id: ev.id,
                quantity: 4,
            },
        )
        .await
        .unwrap();
    h.services
        .bookings
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
        .unwrap();

    // Raising the total raises availability by the same delta.
    let updated = h
        .services
        .catalog
        .update_event(
            &auth_for(&organizer),
            ev.id,
            UpdateEventRequest {
                total_tickets: Some(15),
                ..update_request()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.total_tickets, 15);
    assert_eq!(updated.available_tickets, 11);

    // The total can shrink down to the sold count but not below it.
    let updated = h
        .services
        .catalog
        .update_event(
            &auth_for(&organizer),
            ev.id,
            UpdateEventRequest {
                total_tickets: Some(4),
                ..update_request()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.available_tickets, 0);

    let result = h
        .services
        .catalog
        .update_event(
            &auth_for(&organizer),
            ev.id,
            UpdateEventRequest {
                total_tickets: Some(3),
                ..update_request()
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn only_the_owner_or_admin_can_manage_an_event() {
    let h = TestHarness::new().await;
    let organizer = h.seed_user("Org", Role::Organizer, 0).await;
    let other = h.seed_user("Other", Role::Organizer, 0).await;
    let admin = h.seed_user("Admin", Role::Admin, 0).await;
    let ev = h.seed_event(&organizer, dec!(10), 10).await;

    let result = h
        .services
        .catalog
        .cancel_event(&auth_for(&other), ev.id)
        .await;
    assert_matches!(result, Err(ServiceError::Forbidden(_)));

    let cancelled = h
        .services
        .catalog
        .cancel_event(&auth_for(&admin), ev.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, EventStatus::Cancelled);
}

#[tokio::test]
async fn cancelled_events_are_not_bookable() {
    let h = TestHarness::new().await;
    let organizer = h.seed_user("Org", Role::Organizer, 0).await;
    let customer = h.seed_user("Cust", Role::Customer, 0).await;
    let ev = h.seed_event(&organizer, dec!(10), 10).await;

    h.services
        .catalog
        .cancel_event(&auth_for(&organizer), ev.id)
        .await
        .unwrap();

    let result = h
        .services
        .bookings
        .create_booking(
            &auth_for(&customer),
            CreateBookingRequest {
                event_id: ev.id,
                quantity: 1,
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn events_with_bookings_cannot_be_deleted() {
    let h = TestHarness::new().await;
    let organizer = h.seed_user("Org", Role::Organizer, 0).await;
    let customer = h.seed_user("Cust", Role::Customer, 0).await;
    let ev = h.seed_event(&organizer, dec!(10), 10).await;

    h.services
        .bookings
        .create_booking(
            &auth_for(&customer),
            CreateBookingRequest {
                event_id: ev.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();

    let result = h
        .services
        .catalog
        .delete_event(&auth_for(&organizer), ev.id)
        .await;
    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));

    // A bookingless event deletes cleanly.
    let empty = h.seed_event(&organizer, dec!(10), 10).await;
    h.services
        .catalog
        .delete_event(&auth_for(&organizer), empty.id)
        .await
        .unwrap();
    let result = h.services.catalog.get_event(empty.id).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn listing_hides_cancelled_and_filters_by_search() {
    let h = TestHarness::new().await;
    let organizer = h.seed_user("Org", Role::Organizer, 0).await;

    let keep = h
        .services
        .catalog
        .create_event(&auth_for(&organizer), create_request("Jazz Night", 10))
        .await
        .unwrap();
    let cancel = h
        .services
        .catalog
        .create_event(&auth_for(&organizer), create_request("Rock Gala", 10))
        .await
        .unwrap();
    h.services
        .catalog
        .cancel_event(&auth_for(&organizer), cancel.id)
        .await
        .unwrap();

    let listed = h
        .services
        .catalog
        .list_events(EventListQuery::default())
        .await
        .unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.events[0].id, keep.id);

    let searched = h
        .services
        .catalog
        .list_events(EventListQuery {
            search: Some("Jazz".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(searched.total, 1);

    let missed = h
        .services
        .catalog
        .list_events(EventListQuery {
            search: Some("Opera".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(missed.total, 0);
}
