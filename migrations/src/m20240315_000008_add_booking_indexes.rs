use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Customer booking history, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user_booked_at")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col((Bookings::BookedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // Organizer sales views join bookings by event
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_event_status")
                    .table(Bookings::Table)
                    .col(Bookings::EventId)
                    .col(Bookings::PaymentStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_booking_id")
                    .table(Tickets::Table)
                    .col(Tickets::BookingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_loyalty_transactions_user_created")
                    .table(LoyaltyTransactions::Table)
                    .col(LoyaltyTransactions::UserId)
                    .col((LoyaltyTransactions::CreatedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // Upcoming-events browse filters on end time and status
        manager
            .create_index(
                Index::create()
                    .name("idx_events_status_end_time")
                    .table(Events::Table)
                    .col(Events::Status)
                    .col(Events::EndTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_bookings_user_booked_at").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bookings_event_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tickets_booking_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_loyalty_transactions_user_created")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_events_status_end_time").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    UserId,
    EventId,
    PaymentStatus,
    BookedAt,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    BookingId,
}

#[derive(DeriveIden)]
enum LoyaltyTransactions {
    Table,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Status,
    EndTime,
}
