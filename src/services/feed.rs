//! Personalized feed pipeline.
//!
//! Request flow: cache lookup → on hit return the stored envelope verbatim →
//! on miss build preference maps, retrieve candidates, drop blocked rooms,
//! score, sort, diversify, shape the response, write it back to the cache.
//!
//! Cache failures are fail-open in both directions: a read error degrades to
//! full computation and a write error never fails the request.

use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::cache::{feed_cache_key, FeedCacheStore};
use crate::db::CandidateStore;
use crate::error::{AppError, Result};
use crate::metrics::feed::{
    FEED_CACHE_EVENTS, FEED_CACHE_WRITE_TOTAL, FEED_CANDIDATE_COUNT,
    FEED_REQUEST_DURATION_SECONDS, FEED_REQUEST_TOTAL,
};
use crate::models::{FeedResponse, Pagination, ProjectedDebate};
use crate::services::diversity::diversify;
use crate::services::preferences::PreferenceMaps;
use crate::services::scoring::{has_blocked_interest, score_candidate, ScoredDebate};

/// Tunables for the feed pipeline.
#[derive(Debug, Clone)]
pub struct FeedServiceConfig {
    /// Cache TTL for finished envelopes, in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for FeedServiceConfig {
    fn default() -> Self {
        Self { cache_ttl_secs: 60 }
    }
}

/// Orchestrates the ranking pipeline over storage and cache capabilities.
pub struct FeedService {
    store: Arc<dyn CandidateStore>,
    cache: Arc<dyn FeedCacheStore>,
    config: FeedServiceConfig,
}

impl FeedService {
    pub fn new(
        store: Arc<dyn CandidateStore>,
        cache: Arc<dyn FeedCacheStore>,
        config: FeedServiceConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Produce one page of the personalized feed for the given caller.
    pub async fn personalized_feed(
        &self,
        external_id: &str,
        page: u32,
        limit: u32,
        cursor: Option<Uuid>,
    ) -> Result<FeedResponse> {
        let start = Instant::now();
        let cache_key = feed_cache_key(external_id, page, limit, cursor);

        match self.cache.get(&cache_key).await {
            Ok(Some(cached)) => {
                FEED_CACHE_EVENTS.with_label_values(&["hit"]).inc();
                FEED_REQUEST_TOTAL.with_label_values(&["cache"]).inc();
                FEED_REQUEST_DURATION_SECONDS
                    .with_label_values(&["cache"])
                    .observe(start.elapsed().as_secs_f64());
                return Ok(cached);
            }
            Ok(None) => {
                FEED_CACHE_EVENTS.with_label_values(&["miss"]).inc();
            }
            Err(e) => {
                // Fail open: a broken cache degrades to full computation.
                warn!("Feed cache read failed for {}: {}", cache_key, e);
                FEED_CACHE_EVENTS.with_label_values(&["error"]).inc();
            }
        }

        let profile = self
            .store
            .find_user(external_id)
            .await
            .map_err(|e| {
                error!("Failed to load preferences for user {}: {}", external_id, e);
                e
            })?
            .ok_or_else(|| AppError::UserNotFound(external_id.to_string()))?;

        let prefs = PreferenceMaps::from_profile(&profile);
        let known_categories = prefs.known_categories();

        let candidates = self
            .store
            .fetch_candidates(profile.user_id, &known_categories, i64::from(limit), cursor)
            .await
            .map_err(|e| {
                error!("Candidate query failed for user {}: {}", external_id, e);
                e
            })?;
        let total_count = self
            .store
            .count_candidates(&known_categories)
            .await
            .map_err(|e| {
                error!("Candidate count failed for user {}: {}", external_id, e);
                e
            })?;

        FEED_CANDIDATE_COUNT
            .with_label_values(&["fetched"])
            .observe(candidates.len() as f64);

        let now = Utc::now();
        let mut scored: Vec<ScoredDebate> = candidates
            .into_iter()
            .filter(|debate| !has_blocked_interest(debate, &prefs.blocked_interests))
            .map(|debate| score_candidate(debate, &prefs, now))
            .collect();

        FEED_CANDIDATE_COUNT
            .with_label_values(&["scored"])
            .observe(scored.len() as f64);

        scored.sort_by(|a, b| match b.score.partial_cmp(&a.score) {
            Some(ord) => ord,
            None => {
                warn!(
                    debate_a = %a.debate.id,
                    debate_b = %b.debate.id,
                    "Encountered NaN score in feed ranking, treating as equal"
                );
                Ordering::Equal
            }
        });

        let diversified = diversify(scored);

        let data: Vec<ProjectedDebate> = diversified.into_iter().map(project).collect();

        let next_cursor = data.last().map(|item| item.id);
        let has_next_page = data.len() as u32 == limit;

        let response = FeedResponse {
            data,
            pagination: Pagination {
                total_count,
                page,
                limit,
                has_next_page,
                next_cursor,
            },
        };

        // Fail open on write too: a freshly computed feed always goes out.
        match self
            .cache
            .set(&cache_key, &response, self.config.cache_ttl_secs)
            .await
        {
            Ok(()) => {
                FEED_CACHE_WRITE_TOTAL.with_label_values(&["success"]).inc();
            }
            Err(e) => {
                warn!("Feed cache write failed for {}: {}", cache_key, e);
                FEED_CACHE_WRITE_TOTAL.with_label_values(&["error"]).inc();
            }
        }

        debug!(
            "Computed feed for user {} ({} items, total {})",
            external_id,
            response.data.len(),
            total_count
        );
        FEED_REQUEST_TOTAL.with_label_values(&["computed"]).inc();
        FEED_REQUEST_DURATION_SECONDS
            .with_label_values(&["computed"])
            .observe(start.elapsed().as_secs_f64());

        Ok(response)
    }
}

/// Project a scored candidate into its response record.
fn project(item: ScoredDebate) -> ProjectedDebate {
    let debate = item.debate;

    let agreed_count = debate
        .participants
        .iter()
        .filter(|p| p.agreed == Some(true))
        .count();
    let disagreed_count = debate
        .participants
        .iter()
        .filter(|p| p.agreed == Some(false))
        .count();
    // "Truthy" agreement, kept distinct from agreed_count in the wire format.
    let vote_count = debate
        .participants
        .iter()
        .filter(|p| p.agreed.unwrap_or(false))
        .count();

    let categories = debate.categories.iter().map(|c| c.category).collect();
    let sub_categories = debate
        .categories
        .iter()
        .flat_map(|c| c.sub_categories.iter().copied())
        .collect();

    ProjectedDebate {
        id: debate.id,
        title: debate.title,
        description: debate.description,
        image: debate.image,
        created_at: debate.created_at,
        duration: debate.duration,
        upvotes: debate.upvotes,
        shares: debate.shares,
        participant_count: debate.participant_count,
        agreed_count,
        disagreed_count,
        vote_count,
        creator: debate.creator,
        categories,
        sub_categories,
        participants: debate.participants,
    }
}
