//! Horizon storefront backend
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod db;
pub mod domain;
pub mod handlers;

// Private modules (used only by the binary)
mod config;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
