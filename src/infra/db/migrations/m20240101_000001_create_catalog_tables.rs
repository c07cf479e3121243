//! Migration: authors, categories, narrators, stories and audio tracks.

use sea_orm_migration::prelude::*;

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
                        .table(Authors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Authors::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Authors::AuthorName).string_len(255).not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_timestamps(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::CategoryName)
                                .string_len(255)
                                .not_null(),
                        ),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_timestamps(
                    Table::create()
                        .table(Narrators::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Narrators::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Narrators::NarratorName)
                                .string_len(255)
                                .not_null(),
                        ),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_timestamps(
                    Table::create()
                        .table(Stories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Stories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Stories::Title).string_len(255).not_null())
                        .col(ColumnDef::new(Stories::Description).string_len(1000).not_null())
                        .col(ColumnDef::new(Stories::CoverImagePath).string_len(500).null())
                        .col(ColumnDef::new(Stories::AuthorId).integer().not_null())
                        .col(ColumnDef::new(Stories::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Stories::NarratorId).integer().not_null())
                        .col(
                            ColumnDef::new(Stories::ListenersCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stories_author_id")
                                .from(Stories::Table, Stories::AuthorId)
                                .to(Authors::Table, Authors::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stories_category_id")
                                .from(Stories::Table, Stories::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stories_narrator_id")
                                .from(Stories::Table, Stories::NarratorId)
                                .to(Narrators::Table, Narrators::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_timestamps(
                    Table::create()
                        .table(Audios::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Audios::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Audios::StoryId).integer().not_null())
                        .col(ColumnDef::new(Audios::Title).string_len(255).not_null())
                        .col(ColumnDef::new(Audios::FilePath).string_len(500).not_null())
                        .col(ColumnDef::new(Audios::Duration).integer().not_null().default(0))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_audios_story_id")
                                .from(Audios::Table, Audios::StoryId)
                                .to(Stories::Table, Stories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Foreign keys and soft delete filters
        for index in [
            index_on("idx_authors_deleted_at", Authors::Table, Timestamps::DeletedAt),
            index_on("idx_categories_deleted_at", Categories::Table, Timestamps::DeletedAt),
            index_on("idx_narrators_deleted_at", Narrators::Table, Timestamps::DeletedAt),
            index_on("idx_stories_deleted_at", Stories::Table, Timestamps::DeletedAt),
            index_on("idx_stories_author_id", Stories::Table, Stories::AuthorId),
            index_on("idx_stories_category_id", Stories::Table, Stories::CategoryId),
            index_on("idx_stories_narrator_id", Stories::Table, Stories::NarratorId),
            index_on("idx_audios_deleted_at", Audios::Table, Timestamps::DeletedAt),
            index_on("idx_audios_story_id", Audios::Table, Audios::StoryId),
        ] {
            manager.create_index(index).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Audios::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Narrators::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Authors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Authors {
    Table,
    Id,
    AuthorName,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    CategoryName,
}

#[derive(Iden)]
enum Narrators {
    Table,
    Id,
    NarratorName,
}

#[derive(Iden)]
pub(super) enum Stories {
    Table,
    Id,
    Title,
    Description,
    CoverImagePath,
    AuthorId,
    CategoryId,
    NarratorId,
    ListenersCount,
}

#[derive(Iden)]
enum Audios {
    Table,
    Id,
    StoryId,
    Title,
    FilePath,
    Duration,
}
