//! Account handlers.
//!
//! Passwords are accepted in requests but never returned.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, put},
    Router,
};

use super::ensure_matching_id;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{AccountFilter, AccountRequest, AccountResponse, ChangePasswordRequest};
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent, PageQuery, PaginatedAccounts};

/// Create account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route(
            "/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/:id/password", put(change_password))
        .route("/soft-delete/:id", delete(soft_delete_account))
        .route("/soft/:id", delete(soft_delete_account))
}

/// Get account by ID
#[utoipa::path(
    get,
    path = "/api/account/{id}",
    tag = "Accounts",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.uow.accounts().get_by_id(id).await?.ok_or_not_found()?;
    Ok(Json(account))
}

/// List accounts with optional role and username/email filters
#[utoipa::path(
    get,
    path = "/api/account",
    tag = "Accounts",
    params(PageQuery, AccountFilter),
    responses(
        (status = 200, description = "One page of accounts", body = PaginatedAccounts)
    )
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<AccountFilter>,
) -> AppResult<Json<PaginatedAccounts>> {
    let accounts = state
        .uow
        .accounts()
        .get_paginated(page.pagination(), filter)
        .await?;
    Ok(Json(accounts))
}

/// Register an account
#[utoipa::path(
    post,
    path = "/api/account",
    tag = "Accounts",
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AccountRequest>,
) -> AppResult<Created<AccountResponse>> {
    let account = state.uow.accounts().add(payload).await?;
    Ok(Created::new(format!("/api/account/{}", account.id), account))
}

/// Update an account (the password is re-hashed)
#[utoipa::path(
    put,
    path = "/api/account/{id}",
    tag = "Accounts",
    params(("id" = i32, Path, description = "Account ID")),
    request_body = AccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Validation error or ID mismatch"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AccountRequest>,
) -> AppResult<Json<AccountResponse>> {
    ensure_matching_id(id, payload.id)?;
    let account = state
        .uow
        .accounts()
        .update(id, payload)
        .await?
        .ok_or_not_found()?;
    Ok(Json(account))
}

/// Change password after verifying the current one
#[utoipa::path(
    put,
    path = "/api/account/{id}/password",
    tag = "Accounts",
    params(("id" = i32, Path, description = "Account ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Validation error or wrong current password"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<NoContent> {
    state.uow.accounts().change_password(id, payload).await?;
    Ok(NoContent)
}

/// Permanently delete an account and its ratings
#[utoipa::path(
    delete,
    path = "/api/account/{id}",
    tag = "Accounts",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.accounts().delete(id).await?;
    Ok(NoContent)
}

/// Soft delete an account
#[utoipa::path(
    delete,
    path = "/api/account/soft-delete/{id}",
    tag = "Accounts",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account soft deleted"),
        (status = 404, description = "Account not found or already deleted")
    )
)]
pub async fn soft_delete_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.accounts().soft_delete(id).await?;
    Ok(NoContent)
}
