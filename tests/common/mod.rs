//! Shared harness for integration tests: an in-memory SQLite database with
//! migrations applied and the full service stack wired together.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use eventsphere_api::{
    auth::AuthUser,
    db::{self, DbConfig, DbPool},
    entities::event::{self, EventStatus},
    entities::promotion,
    entities::user::{self, Role},
    events::{self, EventSender},
    handlers::AppServices,
    services::qr::SignedQrIssuer,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;
use uuid::Uuid;

pub struct TestHarness {
    pub db: Arc<DbPool>,
    pub services: AppServices,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestHarness {
    /// Fresh in-memory database. A single connection keeps SQLite's
    /// `:memory:` semantics sane across the pool.
    pub async fn new() -> Self {
        Self::with_database_url("sqlite::memory:", 1).await
    }

    pub async fn with_database_url(url: &str, max_connections: u32) -> Self {
        let cfg = DbConfig {
            url: url.to_string(),
            max_connections,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool).await.expect("migrations");

        let db = Arc::new(pool);
        let (tx, rx) = mpsc::channel(64);
        let sender = EventSender::new(tx);
        let event_task = tokio::spawn(events::process_events(rx));

        let services = AppServices::new(
            db.clone(),
            Arc::new(sender),
            Arc::new(SignedQrIssuer::new("test-qr-signing-secret")),
        );

        Self {
            db,
            services,
            _event_task: event_task,
        }
    }

    pub async fn seed_user(&self, name: &str, role: Role, loyalty_points: i64) -> user::Model {
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(name.to_string()),
            email: Set(format!("{}@example.com", Uuid::new_v4())),
            role: Set(role),
            loyalty_points: Set(loyalty_points),
            created_at: Set(Utc::now()),
        };
        model.insert(&*self.db).await.expect("seed user")
    }

    pub async fn seed_event(
        &self,
        organizer: &user::Model,
        price: Decimal,
        total_tickets: i32,
    ) -> event::Model {
        let now = Utc::now();
        let model = event::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set("Rustfest".to_string()),
            description: Set(None),
            organizer_id: Set(organizer.id),
            venue: Set(Some("Main Hall".to_string())),
            category: Set(Some("Conference".to_string())),
            start_time: Set(now + Duration::days(7)),
            end_time: Set(now + Duration::days(8)),
            ticket_price: Set(price),
            total_tickets: Set(total_tickets),
            available_tickets: Set(total_tickets),
            status: Set(EventStatus::Published),
            image_url: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };
        model.insert(&*self.db).await.expect("seed event")
    }

    pub async fn seed_ended_event(
        &self,
        organizer: &user::Model,
        price: Decimal,
        total_tickets: i32,
    ) -> event::Model {
        let now = Utc::now();
        let model = event::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set("Last Year's Gala".to_string()),
            description: Set(None),
            organizer_id: Set(organizer.id),
            venue: Set(None),
            category: Set(None),
            start_time: Set(now - Duration::days(8)),
            end_time: Set(now - Duration::days(7)),
            ticket_price: Set(price),
            total_tickets: Set(total_tickets),
            available_tickets: Set(total_tickets),
            status: Set(EventStatus::Published),
            image_url: Set(None),
            created_at: Set(now - Duration::days(30)),
            updated_at: Set(None),
        };
        model.insert(&*self.db).await.expect("seed ended event")
    }

    pub async fn seed_promotion(
        &self,
        code: &str,
        percent: Decimal,
        active: bool,
        window: (chrono::DateTime<Utc>, chrono::DateTime<Utc>),
    ) -> promotion::Model {
        let model = promotion::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            description: Set(None),
            discount_percent: Set(percent),
            active: Set(active),
            starts_at: Set(window.0),
            ends_at: Set(window.1),
            created_at: Set(Utc::now()),
        };
        model.insert(&*self.db).await.expect("seed promotion")
    }
}

pub fn auth_for(user: &user::Model) -> AuthUser {
    AuthUser {
        user_id: user.id,
        name: Some(user.full_name.clone()),
        role: user.role,
    }
}

/// A promo window open right now.
pub fn open_window() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let now = Utc::now();
    (now - Duration::days(1), now + Duration::days(30))
}

/// A promo window that closed in the past.
pub fn expired_window() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let now = Utc::now();
    (now - Duration::days(30), now - Duration::days(1))
}
