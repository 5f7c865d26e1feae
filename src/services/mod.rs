//! Business logic for the personalized debate feed.
//!
//! - `preferences`: builds per-request weight lookups from a stored profile
//! - `scoring`: pure relevance scoring of one candidate
//! - `diversity`: sliding-window reordering of the score-sorted list
//! - `feed`: pipeline orchestration, pagination, and cache integration
pub mod diversity;
pub mod feed;
pub mod preferences;
pub mod scoring;

pub use feed::{FeedService, FeedServiceConfig};
pub use preferences::PreferenceMaps;
pub use scoring::{score_candidate, ScoredDebate};
