use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One customer per mail address
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_customer_mail")
                    .table(Customer::Table)
                    .col(Customer::Mail)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listing walks (created_at, id)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customer_created_at")
                    .table(Customer::Table)
                    .col(Customer::CreatedAt)
                    .col(Customer::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_customer_mail").table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_customer_created_at").table(Customer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customer { Table, Mail, CreatedAt, Id }
