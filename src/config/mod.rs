//! Application configuration module
//!
//! Environment-driven settings plus the constants shared by validation,
//! pagination and blob storage.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
