//! API handlers module

pub mod analytics;
pub mod articles;
pub mod health;
pub mod metrics;
pub mod reports;
pub mod search;
pub mod settings;
pub mod sources;
