//! Database access layer.
//!
//! Repository functions live in `user_repo` and `debate_repo`; the
//! `CandidateStore` trait is the narrow capability the ranking pipeline
//! consumes, so it stays independent of the storage technology.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, DebateCandidate, PreferenceProfile};

pub mod debate_repo;
pub mod schema;
pub mod user_repo;

pub use schema::ensure_schema;

/// Storage capability consumed by the feed pipeline.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Fetch the requesting user's preference profile by external identity.
    async fn find_user(&self, external_id: &str) -> Result<Option<PreferenceProfile>>;

    /// Fetch one page of rankable debate rooms for the user.
    async fn fetch_candidates(
        &self,
        user_id: Uuid,
        categories: &[Category],
        limit: i64,
        cursor: Option<Uuid>,
    ) -> Result<Vec<DebateCandidate>>;

    /// Total count of active rooms matching the user's categories.
    async fn count_candidates(&self, categories: &[Category]) -> Result<i64>;
}

/// Postgres-backed candidate store.
#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn find_user(&self, external_id: &str) -> Result<Option<PreferenceProfile>> {
        Ok(user_repo::find_preference_profile(&self.pool, external_id).await?)
    }

    async fn fetch_candidates(
        &self,
        user_id: Uuid,
        categories: &[Category],
        limit: i64,
        cursor: Option<Uuid>,
    ) -> Result<Vec<DebateCandidate>> {
        Ok(debate_repo::fetch_candidates(&self.pool, user_id, categories, limit, cursor).await?)
    }

    async fn count_candidates(&self, categories: &[Category]) -> Result<i64> {
        Ok(debate_repo::count_candidates(&self.pool, categories).await?)
    }
}
