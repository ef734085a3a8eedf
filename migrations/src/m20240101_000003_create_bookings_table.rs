use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Bookings::BookingNumber)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Bookings::EventId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::UserId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::Quantity).integer().not_null())
                    .col(ColumnDef::new(Bookings::TotalAmount).decimal().not_null())
                    .col(
                        ColumnDef::new(Bookings::DiscountApplied)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Bookings::PromotionId).uuid().null())
                    .col(
                        ColumnDef::new(Bookings::PointsUsed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Bookings::FinalAmount).decimal().not_null())
                    .col(
                        ColumnDef::new(Bookings::PaymentStatus)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Bookings::PaymentMethod).string().null())
                    .col(ColumnDef::new(Bookings::BookedAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(Bookings::CheckedIn)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Bookings::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_event_id")
                            .from(Bookings::Table, Bookings::EventId)
                            .to(
                                super::m20240101_000002_create_events_table::Events::Table,
                                super::m20240101_000002_create_events_table::Events::Id,
                            )
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user_id")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(
                                super::m20240101_000001_create_users_table::Users::Table,
                                super::m20240101_000001_create_users_table::Users::Id,
                            )
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Bookings {
    Table,
    Id,
    BookingNumber,
    EventId,
    UserId,
    Quantity,
    TotalAmount,
    DiscountApplied,
    PromotionId,
    PointsUsed,
    FinalAmount,
    PaymentStatus,
    PaymentMethod,
    BookedAt,
    CheckedIn,
    UpdatedAt,
}
