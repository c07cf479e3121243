//! HTTP request handlers.
//!
//! Handlers stay thin: extract and validate input, call one repository
//! method, pick the status code.

pub mod account_handler;
pub mod audio_handler;
pub mod author_handler;
pub mod category_handler;
pub mod narrator_handler;
pub mod rating_handler;
pub mod story_handler;

pub use account_handler::account_routes;
pub use audio_handler::audio_routes;
pub use author_handler::author_routes;
pub use category_handler::category_routes;
pub use narrator_handler::narrator_routes;
pub use rating_handler::rating_routes;
pub use story_handler::story_routes;

use crate::errors::{AppError, AppResult};

/// A body id, when present, must match the id in the path.
pub(crate) fn ensure_matching_id(path_id: i32, body_id: Option<i32>) -> AppResult<()> {
    match body_id {
        Some(body_id) if body_id != path_id => Err(AppError::bad_request(
            "ID in the request body does not match the route ID.",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_matching_id() {
        assert!(ensure_matching_id(3, None).is_ok());
        assert!(ensure_matching_id(3, Some(3)).is_ok());
        assert!(matches!(
            ensure_matching_id(3, Some(4)),
            Err(AppError::BadRequest(_))
        ));
    }
}
