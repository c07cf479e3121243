//! Shared building blocks for every entity repository.
//!
//! All catalog tables carry `id`, `updated_at` and a nullable `deleted_at`;
//! [`SoftDeletable`] exposes those columns so lookups, paging and deletes
//! can be written once and reused by each store.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use crate::errors::{AppError, AppResult};
use crate::types::Pagination;

/// Entity with an integer id and soft-delete audit columns
pub trait SoftDeletable: EntityTrait {
    const ID: Self::Column;
    const UPDATED_AT: Self::Column;
    const DELETED_AT: Self::Column;

    /// Query over rows that have not been soft deleted
    fn live() -> Select<Self> {
        Self::find().filter(Self::DELETED_AT.is_null())
    }
}

/// Load a live row by id; soft-deleted rows count as absent.
pub async fn find_active<E, C>(db: &C, id: i32) -> AppResult<Option<E::Model>>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    Ok(E::live().filter(E::ID.eq(id)).one(db).await?)
}

/// Fetch one page of live rows (ordered by id) plus the total match count.
///
/// A page past the end yields no items but still reports the total.
pub async fn fetch_page<E, C>(
    db: &C,
    query: Select<E>,
    pagination: Pagination,
) -> AppResult<(Vec<E::Model>, u64)>
where
    E: SoftDeletable,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let query = query.filter(E::DELETED_AT.is_null());

    let total = query.clone().count(db).await?;
    let items = query
        .order_by_asc(E::ID)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .all(db)
        .await?;

    Ok((items, total))
}

/// Flag a live row as deleted without touching any other column.
pub async fn soft_delete<E, C>(db: &C, id: i32) -> AppResult<()>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    let now = Utc::now();
    let result = E::update_many()
        .col_expr(E::DELETED_AT, Expr::value(now))
        .col_expr(E::UPDATED_AT, Expr::value(now))
        .filter(E::ID.eq(id))
        .filter(E::DELETED_AT.is_null())
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Remove a row for good, whether or not it was soft deleted.
pub async fn hard_delete<E, C>(db: &C, id: i32) -> AppResult<()>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    let result = E::delete_many().filter(E::ID.eq(id)).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Case-insensitive substring match on a text column.
///
/// `%` and `_` in the needle match literally.
pub fn contains_ci<Col: ColumnTrait>(column: Col, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// Trimmed search term, or `None` when there is nothing to search for.
pub fn search_term(search: &Option<String>) -> Option<&str> {
    search.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Number of live `E` rows per parent id, grouped by the `parent` column.
///
/// Parents without children are absent from the map.
pub async fn count_live_children<E, C>(
    db: &C,
    parent: E::Column,
    parent_ids: &[i32],
) -> AppResult<HashMap<i32, i64>>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    if parent_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i64)> = E::live()
        .select_only()
        .column(parent)
        .column_as(Expr::col(E::ID).count(), "child_count")
        .filter(parent.is_in(parent_ids.iter().copied()))
        .group_by(parent)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows.into_iter().collect())
}
