use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Promotions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Promotions::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Promotions::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Promotions::Description).text().null())
                    .col(
                        ColumnDef::new(Promotions::DiscountPercent)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Promotions::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Promotions::StartsAt).timestamp().not_null())
                    .col(ColumnDef::new(Promotions::EndsAt).timestamp().not_null())
                    .col(ColumnDef::new(Promotions::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Promotions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Promotions {
    Table,
    Id,
    Code,
    Description,
    DiscountPercent,
    Active,
    StartsAt,
    EndsAt,
    CreatedAt,
}
