//! End-to-end tests for the feed pipeline over in-memory storage and cache.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use debate_feed_service::cache::FeedCacheStore;
use debate_feed_service::db::CandidateStore;
use debate_feed_service::error::{AppError, Result};
use debate_feed_service::models::{
    CandidateCategory, Category, CategoryPreference, CreatorSummary, DebateCandidate,
    FeedResponse, Interest, InterestPreference, Participant, PreferenceProfile,
};
use debate_feed_service::services::{FeedService, FeedServiceConfig};

struct StubStore {
    profile: Option<PreferenceProfile>,
    candidates: Vec<DebateCandidate>,
    total: i64,
    fetch_calls: AtomicUsize,
}

impl StubStore {
    fn new(profile: PreferenceProfile, candidates: Vec<DebateCandidate>) -> Self {
        let total = candidates.len() as i64;
        Self {
            profile: Some(profile),
            candidates,
            total,
            fetch_calls: AtomicUsize::new(0),
        }
    }

    fn without_user() -> Self {
        Self {
            profile: None,
            candidates: vec![],
            total: 0,
            fetch_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CandidateStore for StubStore {
    async fn find_user(&self, _external_id: &str) -> Result<Option<PreferenceProfile>> {
        Ok(self.profile.clone())
    }

    async fn fetch_candidates(
        &self,
        _user_id: Uuid,
        _categories: &[Category],
        limit: i64,
        _cursor: Option<Uuid>,
    ) -> Result<Vec<DebateCandidate>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .candidates
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_candidates(&self, _categories: &[Category]) -> Result<i64> {
        Ok(self.total)
    }
}

#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl FeedCacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<FeedResponse>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &FeedResponse, _ttl_secs: u64) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.entries.lock().unwrap().insert(key.to_string(), raw);
        Ok(())
    }
}

struct FailingCache;

#[async_trait]
impl FeedCacheStore for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<FeedResponse>> {
        Err(AppError::Cache("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: &FeedResponse, _ttl_secs: u64) -> Result<()> {
        Err(AppError::Cache("connection refused".into()))
    }
}

fn profile(blocked: Vec<Interest>, following: Vec<Uuid>) -> PreferenceProfile {
    PreferenceProfile {
        user_id: Uuid::new_v4(),
        blocked_interests: blocked,
        following,
        categories: vec![
            CategoryPreference {
                name: Category::ScienceAndTechnology,
                weight: 4,
                interests: vec![
                    InterestPreference {
                        name: Interest::Ai,
                        weight: 3,
                    },
                    InterestPreference {
                        name: Interest::Robotics,
                        weight: 1,
                    },
                ],
            },
            CategoryPreference {
                name: Category::Education,
                weight: 1,
                interests: vec![InterestPreference {
                    name: Interest::SchoolReforms,
                    weight: 1,
                }],
            },
        ],
    }
}

fn room(
    title: &str,
    category: Category,
    sub_categories: Vec<Interest>,
    age_hours: i64,
    creator_id: Uuid,
) -> DebateCandidate {
    DebateCandidate {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "test room".to_string(),
        image: None,
        created_at: Utc::now() - Duration::hours(age_hours),
        duration: 60,
        upvotes: 3,
        shares: 1,
        creator: CreatorSummary {
            id: creator_id,
            username: "creator".to_string(),
            image: None,
        },
        categories: vec![CandidateCategory {
            category,
            sub_categories,
        }],
        participants: vec![Participant {
            user_id: Uuid::new_v4(),
            upvotes: 0,
            agreed: Some(true),
        }],
        participant_count: 1,
    }
}

fn service(store: Arc<StubStore>, cache: Arc<dyn FeedCacheStore>) -> FeedService {
    FeedService::new(store, cache, FeedServiceConfig { cache_ttl_secs: 60 })
}

#[tokio::test]
async fn computes_feed_and_caches_envelope() {
    let creator = Uuid::new_v4();
    let store = Arc::new(StubStore::new(
        profile(vec![], vec![]),
        vec![
            room("ai", Category::ScienceAndTechnology, vec![Interest::Ai], 2, creator),
            room("schools", Category::Education, vec![Interest::SchoolReforms], 2, creator),
        ],
    ));
    let cache = Arc::new(MemoryCache::default());
    let svc = service(store.clone(), cache.clone());

    let first = svc.personalized_feed("u-1", 1, 50, None).await.unwrap();
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.pagination.total_count, 2);
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 1);

    // Second request inside the TTL is served from cache, byte-for-byte.
    let second = svc.personalized_feed("u-1", 1, 50, None).await.unwrap();
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn distinct_request_shapes_do_not_share_cache_entries() {
    let creator = Uuid::new_v4();
    let store = Arc::new(StubStore::new(
        profile(vec![], vec![]),
        vec![room("ai", Category::ScienceAndTechnology, vec![Interest::Ai], 2, creator)],
    ));
    let cache = Arc::new(MemoryCache::default());
    let svc = service(store.clone(), cache.clone());

    svc.personalized_feed("u-1", 1, 50, None).await.unwrap();
    svc.personalized_feed("u-1", 1, 20, None).await.unwrap();
    svc.personalized_feed("u-2", 1, 50, None).await.unwrap();

    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 3);
    assert_eq!(cache.entries.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn blocked_interest_rooms_never_surface() {
    let creator = Uuid::new_v4();
    let store = Arc::new(StubStore::new(
        profile(vec![Interest::Ai], vec![]),
        vec![
            room("ai", Category::ScienceAndTechnology, vec![Interest::Ai], 2, creator),
            room(
                "robots",
                Category::ScienceAndTechnology,
                vec![Interest::Robotics],
                2,
                creator,
            ),
        ],
    ));
    let svc = service(store, Arc::new(MemoryCache::default()));

    let feed = svc.personalized_feed("u-1", 1, 50, None).await.unwrap();

    assert_eq!(feed.data.len(), 1);
    assert_eq!(feed.data[0].title, "robots");
}

#[tokio::test]
async fn unknown_user_is_rejected() {
    let store = Arc::new(StubStore::without_user());
    let svc = service(store, Arc::new(MemoryCache::default()));

    let err = svc.personalized_feed("ghost", 1, 50, None).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(_)));
}

#[tokio::test]
async fn cache_failures_degrade_to_computation() {
    let creator = Uuid::new_v4();
    let store = Arc::new(StubStore::new(
        profile(vec![], vec![]),
        vec![room("ai", Category::ScienceAndTechnology, vec![Interest::Ai], 2, creator)],
    ));
    let svc = service(store.clone(), Arc::new(FailingCache));

    // Both the read and the write fail; the request still succeeds.
    let feed = svc.personalized_feed("u-1", 1, 50, None).await.unwrap();
    assert_eq!(feed.data.len(), 1);

    let again = svc.personalized_feed("u-1", 1, 50, None).await.unwrap();
    assert_eq!(again.data.len(), 1);
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn full_page_advertises_next_cursor() {
    let creator = Uuid::new_v4();
    let rooms: Vec<DebateCandidate> = (0..3)
        .map(|i| {
            room(
                &format!("room-{}", i),
                Category::ScienceAndTechnology,
                vec![Interest::Ai],
                i + 1,
                creator,
            )
        })
        .collect();
    let store = Arc::new(StubStore::new(profile(vec![], vec![]), rooms));
    let svc = service(store, Arc::new(MemoryCache::default()));

    let feed = svc.personalized_feed("u-1", 1, 3, None).await.unwrap();

    assert_eq!(feed.data.len(), 3);
    assert!(feed.pagination.has_next_page);
    assert_eq!(feed.pagination.next_cursor, Some(feed.data[2].id));
}

#[tokio::test]
async fn short_page_ends_pagination() {
    let creator = Uuid::new_v4();
    let store = Arc::new(StubStore::new(
        profile(vec![], vec![]),
        vec![room("only", Category::Education, vec![Interest::SchoolReforms], 2, creator)],
    ));
    let svc = service(store, Arc::new(MemoryCache::default()));

    let feed = svc.personalized_feed("u-1", 1, 50, None).await.unwrap();
    assert!(!feed.pagination.has_next_page);
    assert_eq!(feed.pagination.next_cursor, Some(feed.data[0].id));

    let empty_store = Arc::new(StubStore::new(profile(vec![], vec![]), vec![]));
    let svc = service(empty_store, Arc::new(MemoryCache::default()));
    let feed = svc.personalized_feed("u-1", 1, 50, None).await.unwrap();
    assert!(feed.data.is_empty());
    assert!(!feed.pagination.has_next_page);
    assert_eq!(feed.pagination.next_cursor, None);
}

#[tokio::test]
async fn followed_creator_outranks_identical_room() {
    let followed = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let store = Arc::new(StubStore::new(
        profile(vec![], vec![followed]),
        vec![
            room(
                "stranger",
                Category::ScienceAndTechnology,
                vec![Interest::Ai],
                2,
                stranger,
            ),
            room(
                "followed",
                Category::ScienceAndTechnology,
                vec![Interest::Ai],
                2,
                followed,
            ),
        ],
    ));
    let svc = service(store, Arc::new(MemoryCache::default()));

    let feed = svc.personalized_feed("u-1", 1, 50, None).await.unwrap();

    assert_eq!(feed.data.len(), 2);
    assert_eq!(feed.data[0].title, "followed");
}
