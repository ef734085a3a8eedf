//! Generators for the human-facing codes attached to bookings and
//! payments: ticket numbers, invoice numbers, and payment references.

use chrono::{DateTime, Datelike, Utc};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Prefix for ticket numbers.
pub const TICKET_PREFIX: &str = "EVT";

/// Formats a ticket number, e.g. `EVT-20250110-000015-001`.
///
/// The booking number is zero-padded to six digits and the per-booking
/// sequence to three, so codes sort lexicographically in issue order.
pub fn ticket_number(booked_at: DateTime<Utc>, booking_number: i64, sequence: u32) -> String {
    format!(
        "{}-{}-{:06}-{:03}",
        TICKET_PREFIX,
        booked_at.format("%Y%m%d"),
        booking_number,
        sequence
    )
}

/// Formats an invoice number, e.g. `INV-2025-000015`.
pub fn invoice_number(paid_at: DateTime<Utc>, booking_number: i64) -> String {
    format!("INV-{}-{:06}", paid_at.year(), booking_number)
}

/// Generates a payment reference, e.g. `REF-20250110143025-8FK2`.
///
/// The random suffix keeps references unique when two payments land within
/// the same second.
pub fn reference_number(paid_at: DateTime<Utc>) -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("REF-{}-{}", paid_at.format("%Y%m%d%H%M%S"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(15, 1, "EVT-20250110-000015-001")]
    #[case(15, 2, "EVT-20250110-000015-002")]
    #[case(15, 3, "EVT-20250110-000015-003")]
    #[case(123_456, 999, "EVT-20250110-123456-999")]
    fn ticket_numbers_are_zero_padded_and_sequenced(
        #[case] booking_number: i64,
        #[case] sequence: u32,
        #[case] expected: &str,
    ) {
        let booked_at = Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap();
        assert_eq!(ticket_number(booked_at, booking_number, sequence), expected);
    }

    #[test]
    fn invoice_numbers_carry_the_year_and_booking_number() {
        let paid_at = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();
        assert_eq!(invoice_number(paid_at, 15), "INV-2025-000015");
    }

    #[test]
    fn reference_numbers_embed_the_timestamp() {
        let paid_at = Utc.with_ymd_and_hms(2025, 1, 10, 14, 30, 25).unwrap();
        let reference = reference_number(paid_at);
        assert!(reference.starts_with("REF-20250110143025-"));
        assert_eq!(reference.len(), "REF-20250110143025-".len() + 4);
    }
}
