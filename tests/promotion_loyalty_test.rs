//! Tests for the promotion resolver and the loyalty ledger read surface.

mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use common::{auth_for, expired_window, open_window, TestHarness};
use eventsphere_api::{
    entities::user::Role,
    errors::ServiceError,
    services::bookings::{ConfirmPaymentRequest, CreateBookingRequest},
    services::promotions::{CreatePromotionRequest, PromotionService},
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn resolve_matches_exact_case_within_the_window() {
    let h = TestHarness::new().await;
    h.seed_promotion("Save10", dec!(10), true, open_window())
        .await;

    let now = Utc::now();
    let found = PromotionService::resolve(&*h.db, "Save10", now).await.unwrap();
    assert!(found.is_some());

    // Codes are case-sensitive.
    let miss = PromotionService::resolve(&*h.db, "SAVE10", now).await.unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn resolve_rejects_inactive_and_expired_codes() {
    let h = TestHarness::new().await;
    h.seed_promotion("OFF", dec!(20), false, open_window()).await;
    h.seed_promotion("GONE", dec!(20), true, expired_window())
        .await;

    let now = Utc::now();
    assert!(PromotionService::resolve(&*h.db, "OFF", now)
        .await
        .unwrap()
        .is_none());
    assert!(PromotionService::resolve(&*h.db, "GONE", now)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn list_active_excludes_closed_windows() {
    let h = TestHarness::new().await;
    h.seed_promotion("NOW", dec!(5), true, open_window()).await;
    h.seed_promotion("PAST", dec!(5), true, expired_window())
        .await;
    h.seed_promotion("DISABLED", dec!(5), false, open_window())
        .await;

    let active = h.services.promotions.list_active(Utc::now()).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].code, "NOW");
}

#[tokio::test]
async fn create_promotion_validates_percent_window_and_uniqueness() {
    let h = TestHarness::new().await;
    let (starts_at, ends_at) = open_window();

    let created = h
        .services
        .promotions
        .create(CreatePromotionRequest {
            code: "WELCOME".to_string(),
            description: Some("New customer discount".to_string()),
            discount_percent: dec!(15),
            starts_at,
            ends_at,
        })
        .await
        .unwrap();
    assert!(created.active);

    let duplicate = h
        .services
        .promotions
        .create(CreatePromotionRequest {
            code: "WELCOME".to_string(),
            description: None,
            discount_percent: dec!(5),
            starts_at,
            ends_at,
        })
        .await;
    assert_matches!(duplicate, Err(ServiceError::InvalidOperation(_)));

    let over_hundred = h
        .services
        .promotions
        .create(CreatePromotionRequest {
            code: "TOOBIG".to_string(),
            description: None,
            discount_percent: dec!(120),
            starts_at,
            ends_at,
        })
        .await;
    assert_matches!(over_hundred, Err(ServiceError::ValidationError(_)));

    let inverted_window = h
        .services
        .promotions
        .create(CreatePromotionRequest {
            code: "BACKWARDS".to_string(),
            description: None,
            discount_percent: dec!(10),
            starts_at: ends_at,
            ends_at: starts_at,
        })
        .await;
    assert_matches!(inverted_window, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn loyalty_history_records_both_sides_of_a_payment() {
    let h = TestHarness::new().await;
    let organizer = h.seed_user("Org", Role::Organizer, 0).await;
    let customer = h.seed_user("Cust", Role::Customer, 80).await;
    let ev = h.seed_event(&organizer, dec!(100), 10).await;
    let auth = auth_for(&customer);

    let booking = h
        .services
        .bookings
        .create_booking(
            &auth,
            CreateBookingRequest {
                event_id: ev.id,
                quantity: 2,
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
                use_points: true,
                payment_method: "card".to_string(),
            },
        )
        .await
        .unwrap();

    // total 200, 80 points redeemed, final 120, earned floor(120*0.05)=6.
    let balance = h.services.loyalty.balance(customer.id).await.unwrap();
    assert_eq!(balance, 6);

    let history = h.services.loyalty.history(customer.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|t| t.points == -80 && t.is_redeem()));
    assert!(history.iter().any(|t| t.points == 6 && t.is_earn()));

    // Reconciliation: initial + sum(deltas) == balance.
    let deltas: i64 = history.iter().map(|t| t.points).sum();
    assert_eq!(80 + deltas, balance);
}

#[tokio::test]
async fn unknown_user_balance_is_not_found() {
    let h = TestHarness::new().await;
    let result = h.services.loyalty.balance(uuid::Uuid::new_v4()).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}
