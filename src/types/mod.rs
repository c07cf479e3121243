//! Shared value objects.

mod pagination;
mod response;
mod upload;

pub use pagination::{
    PageQuery, PaginatedAccounts, PaginatedAudios, PaginatedAuthors, PaginatedCategories,
    PaginatedNarrators, PaginatedRatings, PaginatedResponse, PaginatedStories, Pagination,
};
pub use response::{ApiResponse, Created, NoContent};
pub use upload::{UploadDir, UploadWriter, UploadedFile};
