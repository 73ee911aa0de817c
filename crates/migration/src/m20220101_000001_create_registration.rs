//! Create `registration` table.
//!
//! One row per registrant; the unique key on `email` is what rejects
//! duplicate sign-ups at the store level.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(uuid(Registration::Id).primary_key())
                    .col(string_len(Registration::Name, 128).not_null())
                    .col(string_len(Registration::Email, 255).unique_key().not_null())
                    .col(string_len(Registration::Phone, 16).not_null())
                    .col(string_len(Registration::Qualification, 128).not_null())
                    .col(string_len(Registration::SchoolOrCollegeName, 255).not_null())
                    .col(
                        string_len(Registration::PaymentScreenshot, 512)
                            .not_null()
                            .default(""),
                    )
                    .col(string_len(Registration::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Registration::RegisteredAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Registration {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Qualification,
    SchoolOrCollegeName,
    PaymentScreenshot,
    Status,
    RegisteredAt,
}
