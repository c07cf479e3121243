//! SeaORM entity definitions
//!
//! These are database-specific entities separate from the API shapes in
//! `crate::domain`.

pub mod account;
pub mod audio;
pub mod author;
pub mod category;
pub mod narrator;
pub mod rating;
pub mod story;
