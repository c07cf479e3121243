//! Account repository with Argon2 password storage.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use super::base::{self, contains_ci, search_term};
use super::entities::account;
use super::mapping;
use crate::domain::{AccountFilter, AccountRequest, AccountResponse, ChangePasswordRequest, Password};
use crate::errors::{AppError, AppResult};
use crate::types::{PaginatedResponse, Pagination};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
///
/// Password hashes never leave this repository.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<AccountResponse>>;

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: AccountFilter,
    ) -> AppResult<PaginatedResponse<AccountResponse>>;

    /// Conflict when the email is already registered
    async fn add(&self, request: AccountRequest) -> AppResult<AccountResponse>;

    async fn update(&self, id: i32, request: AccountRequest) -> AppResult<Option<AccountResponse>>;

    /// Verify the current password, then store the new one.
    ///
    /// NotFound when absent; Validation when the current password is wrong.
    async fn change_password(&self, id: i32, request: ChangePasswordRequest) -> AppResult<()>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;
}

pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reject an email held by any other account, soft-deleted ones included.
    async fn ensure_email_available(&self, email: &str, except_id: Option<i32>) -> AppResult<()> {
        let mut query = account::Entity::find().filter(account::Column::Email.eq(email));
        if let Some(id) = except_id {
            query = query.filter(account::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(AppError::conflict("Email is already registered."));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<AccountResponse>> {
        let model = base::find_active::<account::Entity, _>(&self.db, id).await?;
        Ok(model.map(mapping::account_response))
    }

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: AccountFilter,
    ) -> AppResult<PaginatedResponse<AccountResponse>> {
        let mut query = account::Entity::find();
        if let Some(role) = filter.role {
            query = query.filter(account::Column::Role.eq(role.as_str()));
        }
        if let Some(term) = search_term(&filter.search) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(account::Column::Username, term))
                    .add(contains_ci(account::Column::Email, term)),
            );
        }

        let (models, total) = base::fetch_page(&self.db, query, pagination).await?;
        let items = models.into_iter().map(mapping::account_response).collect();

        Ok(PaginatedResponse::new(items, total, pagination))
    }

    async fn add(&self, request: AccountRequest) -> AppResult<AccountResponse> {
        self.ensure_email_available(&request.email, None).await?;
        let password = Password::new(&request.password)?;

        let now = Utc::now();
        let mut active = account::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        mapping::apply_account(
            &mut active,
            request.username,
            request.email,
            password.into_string(),
            request.role,
        );

        let model = active.insert(&self.db).await?;
        tracing::info!(account_id = model.id, role = %model.role, "Account created");

        Ok(mapping::account_response(model))
    }

    async fn update(&self, id: i32, request: AccountRequest) -> AppResult<Option<AccountResponse>> {
        let Some(existing) = base::find_active::<account::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };
        self.ensure_email_available(&request.email, Some(id)).await?;
        let password = Password::new(&request.password)?;

        let mut active: account::ActiveModel = existing.into();
        mapping::apply_account(
            &mut active,
            request.username,
            request.email,
            password.into_string(),
            request.role,
        );
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        tracing::debug!(account_id = id, "Account updated");

        Ok(Some(mapping::account_response(model)))
    }

    async fn change_password(&self, id: i32, request: ChangePasswordRequest) -> AppResult<()> {
        let existing = base::find_active::<account::Entity, _>(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !Password::from_hash(existing.password_hash.clone()).verify(&request.current_password) {
            tracing::debug!(account_id = id, "Password change rejected");
            return Err(AppError::validation("Current password is incorrect."));
        }
        let password = Password::new(&request.new_password)?;

        let mut active: account::ActiveModel = existing.into();
        active.password_hash = Set(password.into_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        tracing::info!(account_id = id, "Password changed");
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        base::hard_delete::<account::Entity, _>(&self.db, id).await?;
        tracing::info!(account_id = id, "Account deleted");
        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<account::Entity, _>(&self.db, id).await?;
        tracing::info!(account_id = id, "Account soft deleted");
        Ok(())
    }
}
