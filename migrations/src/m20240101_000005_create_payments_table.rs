use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Payments::BookingId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::Amount).decimal().not_null())
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string()
                            .not_null()
                            .default("Completed"),
                    )
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(
                        ColumnDef::new(Payments::ReferenceNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::InvoiceNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::PaidAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_booking_id")
                            .from(Payments::Table, Payments::BookingId)
                            .to(
                                super::m20240101_000003_create_bookings_table::Bookings::Table,
                                super::m20240101_000003_create_bookings_table::Bookings::Id,
                            )
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Payments {
    Table,
    Id,
    BookingId,
    Amount,
    Status,
    Method,
    ReferenceNumber,
    InvoiceNumber,
    PaidAt,
}
