//! Newsdesk Common Library
//!
//! Shared code for the dashboard gateway and client including:
//! - Database models and repository patterns
//! - Article query and pagination types
//! - API payload types
//! - Analytics aggregation and source health
//! - Error types and handling
//! - Configuration management
//! - Metrics and display formatting

pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod format;
pub mod health;
pub mod metrics;
pub mod query;
pub mod settings;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
