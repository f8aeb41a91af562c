//! Newsdesk Client Library
//!
//! Typed access to the dashboard API plus the state a dashboard front end
//! keeps around it:
//! - `DashboardApi` and its reqwest implementation
//! - `FilterStore`, the shared filter and search state
//! - `ArticleFeed`, which follows the store and discards stale responses
//! - `Poller` for periodic analytics refresh

pub mod api;
pub mod debounce;
pub mod display;
pub mod error;
pub mod feed;
pub mod poller;
pub mod store;

// Re-export commonly used types
pub use api::{DashboardApi, HttpDashboardClient};
pub use error::{ClientError, Result};
pub use feed::{ArticleFeed, FeedState, FeedStatus};
pub use poller::Poller;
pub use store::{FilterSnapshot, FilterStore, SearchResults};
