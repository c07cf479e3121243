//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::{
    AccountResponse, AudioResponse, AuthorResponse, CategoryResponse, NarratorResponse,
    RatingResponse, StoryResponse,
};

/// Sanitized page request.
///
/// Invalid input is clamped rather than rejected: a page number below 1
/// becomes 1 and a page size below 1 becomes the default size. Sizes are
/// capped at [`MAX_PAGE_SIZE`] and the page number is capped so the row
/// offset still fits in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_number: u64,
    page_size: u64,
}

impl Pagination {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        let page_number = if page_number < 1 {
            DEFAULT_PAGE_NUMBER
        } else {
            page_number as u64
        };
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            (page_size as u64).min(MAX_PAGE_SIZE)
        };
        let page_number = page_number.min(i64::MAX as u64 / page_size);

        Self {
            page_number,
            page_size,
        }
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page_number - 1) * self.page_size
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `?pageNumber=&pageSize=` query parameters shared by every list endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (values below 1 are treated as 1)
    pub page_number: Option<i64>,
    /// Items per page (values below 1 are treated as 10)
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.page_number.unwrap_or(DEFAULT_PAGE_NUMBER as i64),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE as i64),
        )
    }
}

/// A page of items plus the total number of matching rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(
    PaginatedAccounts = PaginatedResponse<AccountResponse>,
    PaginatedAudios = PaginatedResponse<AudioResponse>,
    PaginatedAuthors = PaginatedResponse<AuthorResponse>,
    PaginatedCategories = PaginatedResponse<CategoryResponse>,
    PaginatedNarrators = PaginatedResponse<NarratorResponse>,
    PaginatedRatings = PaginatedResponse<RatingResponse>,
    PaginatedStories = PaginatedResponse<StoryResponse>
)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u64,
    pub page_size: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total_count: u64, pagination: Pagination) -> Self {
        Self {
            items,
            total_count,
            page_number: pagination.page_number(),
            page_size: pagination.page_size(),
        }
    }

    /// Transform every item while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}
