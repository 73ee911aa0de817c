use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Registration: index on registered_at for the most-recent-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_registered_at")
                    .table(Registration::Table)
                    .col(Registration::RegisteredAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_registration_registered_at")
                    .table(Registration::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Registration {
    Table,
    RegisteredAt,
}
