use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tickets::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Tickets::BookingId).uuid().not_null())
                    .col(
                        ColumnDef::new(Tickets::TicketNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tickets::QrCode).text().null())
                    .col(ColumnDef::new(Tickets::IssuedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_booking_id")
                            .from(Tickets::Table, Tickets::BookingId)
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
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Tickets {
    Table,
    Id,
    BookingId,
    TicketNumber,
    QrCode,
    IssuedAt,
}
