pub mod bookings;
pub mod events;
pub mod loyalty;
pub mod promotions;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::qr::TicketQrIssuer;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<crate::services::event_catalog::EventCatalogService>,
    pub bookings: Arc<crate::services::bookings::BookingService>,
    pub promotions: Arc<crate::services::promotions::PromotionService>,
    pub loyalty: Arc<crate::services::loyalty::LoyaltyService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        qr_issuer: Arc<dyn TicketQrIssuer>,
    ) -> Self {
        let catalog = Arc::new(crate::services::event_catalog::EventCatalogService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let bookings = Arc::new(crate::services::bookings::BookingService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
            qr_issuer,
        ));
        let promotions = Arc::new(crate::services::promotions::PromotionService::new(
            db_pool.clone(),
            Some(event_sender),
        ));
        let loyalty = Arc::new(crate::services::loyalty::LoyaltyService::new(db_pool.clone()));
        let inventory = Arc::new(crate::services::inventory::InventoryService::new(db_pool));

        Self {
            catalog,
            bookings,
            promotions,
            loyalty,
            inventory,
        }
    }
}
