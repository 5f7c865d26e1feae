/// Debate Feed Service Library
///
/// Serves the personalized debate-room feed: candidate retrieval from
/// Postgres, multi-factor scoring against stored user preferences, a
/// sliding-window diversity pass, and short-lived Redis caching of
/// finished pages.
///
/// # Modules
///
/// - `handlers`: Feed HTTP request handlers
/// - `models`: Wire and domain data structures
/// - `services`: Scoring, diversity, and pipeline orchestration
/// - `db`: Database access layer and repositories
/// - `cache`: Feed envelope caching
/// - `middleware`: Caller identity extraction
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
