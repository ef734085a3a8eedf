use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoyaltyTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoyaltyTransactions::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LoyaltyTransactions::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(LoyaltyTransactions::BookingId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoyaltyTransactions::Points)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LoyaltyTransactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(LoyaltyTransactions::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoyaltyTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loyalty_transactions_user_id")
                            .from(LoyaltyTransactions::Table, LoyaltyTransactions::UserId)
                            .to(
                                super::m20240101_000001_create_users_table::Users::Table,
                                super::m20240101_000001_create_users_table::Users::Id,
                            )
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loyalty_transactions_booking_id")
                            .from(LoyaltyTransactions::Table, LoyaltyTransactions::BookingId)
                            .to(
                                super::m20240101_000003_create_bookings_table::Bookings::Table,
                                super::m20240101_000003_create_bookings_table::Bookings::Id,
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
            .drop_table(
                Table::drop()
                    .table(LoyaltyTransactions::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum LoyaltyTransactions {
    Table,
    Id,
    UserId,
    BookingId,
    Points,
    Kind,
    Description,
    CreatedAt,
}
