//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_catalog_tables;
mod m20240102_000001_create_accounts_and_ratings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_catalog_tables::Migration),
            Box::new(m20240102_000001_create_accounts_and_ratings::Migration),
        ]
    }
}

/// Audit columns shared by every table
#[derive(Iden, Clone, Copy)]
pub(super) enum Timestamps {
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

/// Append `created_at`, `updated_at` and the nullable `deleted_at` column.
pub(super) fn with_timestamps(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Timestamps::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Timestamps::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Timestamps::DeletedAt)
                .timestamp_with_time_zone()
                .null(),
        )
}

/// Plain (non-unique) index on a single column.
pub(super) fn index_on<T, C>(name: &str, table: T, col: C) -> IndexCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    Index::create()
        .name(name)
        .table(table)
        .col(col)
        .if_not_exists()
        .to_owned()
}
