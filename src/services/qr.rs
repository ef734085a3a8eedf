//! Ticket QR issuance boundary.
//!
//! The booking flow treats QR generation as an external collaborator that
//! maps ticket metadata to an opaque image reference. The shipped
//! implementation derives a deterministic, HMAC-signed media path so a lost
//! reference can be regenerated from the same inputs; rasterizing the
//! actual image is left to the media pipeline.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::ServiceError;

type HmacSha256 = Hmac<Sha256>;

/// Metadata baked into a ticket's QR payload.
#[derive(Debug, Clone)]
pub struct QrTicket<'a> {
    pub ticket_number: &'a str,
    pub booking_number: i64,
    pub event_title: &'a str,
    pub customer_name: &'a str,
    pub event_start: DateTime<Utc>,
}

pub trait TicketQrIssuer: Send + Sync {
    /// Returns an opaque image reference for the ticket.
    fn issue(&self, ticket: &QrTicket<'_>) -> Result<String, ServiceError>;
}

/// Deterministic issuer: the reference is a media path keyed by the ticket
/// number and an HMAC of the payload, so re-issuing for the same ticket
/// yields the same reference.
#[derive(Clone)]
pub struct SignedQrIssuer {
    secret: String,
}

impl SignedQrIssuer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn payload(ticket: &QrTicket<'_>) -> String {
        format!(
            "Ticket Code: {}\nBooking ID: {}\nEvent: {}\nDate: {}\nCustomer: {}",
            ticket.ticket_number,
            ticket.booking_number,
            ticket.event_title,
            ticket.event_start.format("%Y-%m-%d"),
            ticket.customer_name,
        )
    }
}

impl TicketQrIssuer for SignedQrIssuer {
    fn issue(&self, ticket: &QrTicket<'_>) -> Result<String, ServiceError> {
        if ticket.ticket_number.is_empty() {
            return Err(ServiceError::ValidationError(
                "ticket number must not be empty".to_string(),
            ));
        }

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| ServiceError::InternalError(format!("invalid QR signing key: {e}")))?;
        mac.update(Self::payload(ticket).as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!(
            "/media/qr/{}-{}.png",
            ticket.ticket_number,
            &signature[..16]
        ))
    }
}
