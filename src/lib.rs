//! Audiobook API - REST catalog of audiobook stories
//!
//! Stories belong to an author, a category and a narrator, carry an optional
//! cover image and a list of audio tracks, and are rated by accounts. Every
//! resource supports paginated listing, create, update, hard delete and soft
//! delete.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: Command-line interface and its implementations
//! - **config**: Application configuration and constants
//! - **domain**: Request/response types, validation rules and passwords
//! - **infra**: Database, migrations, repositories and blob storage
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: Shared types (pagination, responses, uploads)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (runs pending migrations first)
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
