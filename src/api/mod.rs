//! API layer - HTTP handlers and routing
//!
//! - Request handlers, one module per resource
//! - Validating extractors for JSON and multipart bodies
//! - Route definitions and OpenAPI documentation

pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
