use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(ColumnDef::new(Events::OrganizerId).uuid().not_null())
                    .col(ColumnDef::new(Events::Venue).string().null())
                    .col(ColumnDef::new(Events::Category).string().null())
                    .col(ColumnDef::new(Events::StartTime).timestamp().not_null())
                    .col(ColumnDef::new(Events::EndTime).timestamp().not_null())
                    .col(
                        ColumnDef::new(Events::TicketPrice)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Events::TotalTickets).integer().not_null())
                    .col(
                        ColumnDef::new(Events::AvailableTickets)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::Status)
                            .string()
                            .not_null()
                            .default("Published"),
                    )
                    .col(ColumnDef::new(Events::ImageUrl).string().null())
                    .col(ColumnDef::new(Events::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Events::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_organizer_id")
                            .from(Events::Table, Events::OrganizerId)
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
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Events {
    Table,
    Id,
    Title,
    Description,
    OrganizerId,
    Venue,
    Category,
    StartTime,
    EndTime,
    TicketPrice,
    TotalTickets,
    AvailableTickets,
    Status,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}
