pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_events_table;
mod m20240101_000003_create_bookings_table;
mod m20240101_000004_create_tickets_table;
mod m20240101_000005_create_payments_table;
mod m20240101_000006_create_promotions_table;
mod m20240101_000007_create_loyalty_transactions_table;
mod m20240315_000008_add_booking_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_events_table::Migration),
            Box::new(m20240101_000003_create_bookings_table::Migration),
            Box::new(m20240101_000004_create_tickets_table::Migration),
            Box::new(m20240101_000005_create_payments_table::Migration),
            Box::new(m20240101_000006_create_promotions_table::Migration),
            Box::new(m20240101_000007_create_loyalty_transactions_table::Migration),
            Box::new(m20240315_000008_add_booking_indexes::Migration),
        ]
    }
}
