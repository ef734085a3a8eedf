use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EventSphere API",
        version = "0.1.0",
        description = "Event ticketing backend: browse events, book tickets, confirm payments \
                       with promotions and loyalty points, and issue QR-coded tickets."
    ),
    tags(
        (name = "Events", description = "Event catalog endpoints"),
        (name = "Bookings", description = "Booking and payment endpoints"),
        (name = "Promotions", description = "Promotion code endpoints"),
        (name = "Loyalty", description = "Loyalty point endpoints")
    ),
    paths(
        // Events
        crate::handlers::events::list_events,
        crate::handlers::events::get_event,
        crate::handlers::events::get_availability,
        crate::handlers::events::create_event,
        crate::handlers::events::update_event,
        crate::handlers::events::cancel_event,
        crate::handlers::events::delete_event,

        // Bookings
        crate::handlers::bookings::create_booking,
        crate::handlers::bookings::confirm_payment,
        crate::handlers::bookings::get_booking,
        crate::handlers::bookings::list_my_bookings,
        crate::handlers::bookings::check_in,

        // Promotions
        crate::handlers::promotions::list_active,
        crate::handlers::promotions::create_promotion,

        // Loyalty
        crate::handlers::loyalty::get_balance,
        crate::handlers::loyalty::get_history,
    ),
    components(
        schemas(
            crate::services::bookings::CreateBookingRequest,
            crate::services::bookings::ConfirmPaymentRequest,
            crate::services::bookings::BookingView,
            crate::services::bookings::TicketView,
            crate::services::bookings::PaymentView,
            crate::services::bookings::MyBookingsView,
            crate::services::event_catalog::CreateEventRequest,
            crate::services::event_catalog::UpdateEventRequest,
            crate::services::promotions::CreatePromotionRequest,
            crate::handlers::loyalty::LoyaltyBalanceView,
            crate::handlers::events::AvailabilityView,
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDocV1;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
