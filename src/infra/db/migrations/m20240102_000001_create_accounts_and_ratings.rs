//! Migration: listener accounts and their story ratings.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_catalog_tables::Stories;
use super::{index_on, with_timestamps, Timestamps};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_timestamps(
                    Table::create()
                        .table(Accounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Accounts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Accounts::Username).string_len(255).not_null())
                        .col(
                            ColumnDef::new(Accounts::Email)
                                .string_len(255)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Accounts::Role)
                                .string_len(20)
                                .not_null()
                                .default("user"),
                        ),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_timestamps(
                    Table::create()
                        .table(Ratings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Ratings::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Ratings::AccountId).integer().not_null())
                        .col(ColumnDef::new(Ratings::StoryId).integer().not_null())
                        .col(ColumnDef::new(Ratings::RatingValue).integer().not_null())
                        .col(ColumnDef::new(Ratings::Comment).string_len(1000).null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_ratings_account_id")
                                .from(Ratings::Table, Ratings::AccountId)
                                .to(Accounts::Table, Accounts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_ratings_story_id")
                                .from(Ratings::Table, Ratings::StoryId)
                                .to(Stories::Table, Stories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        for index in [
            index_on("idx_accounts_deleted_at", Accounts::Table, Timestamps::DeletedAt),
            index_on("idx_ratings_deleted_at", Ratings::Table, Timestamps::DeletedAt),
            index_on("idx_ratings_account_id", Ratings::Table, Ratings::AccountId),
            index_on("idx_ratings_story_id", Ratings::Table, Ratings::StoryId),
        ] {
            manager.create_index(index).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ratings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
}

#[derive(Iden)]
enum Ratings {
    Table,
    Id,
    AccountId,
    StoryId,
    RatingValue,
    Comment,
}
