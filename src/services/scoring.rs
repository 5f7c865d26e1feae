//! Relevance scoring for one debate candidate.
//!
//! `score_candidate` is a pure function of the candidate, the user's
//! preference maps, and the current time. Candidates carrying a blocked
//! interest must be filtered out with `has_blocked_interest` before scoring.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::models::{Category, DebateCandidate, Interest};
use crate::services::preferences::PreferenceMaps;

const CATEGORY_TAG_MULTIPLIER: f64 = 3.0;
const INTEREST_TAG_MULTIPLIER: f64 = 2.0;

const FOLLOWED_CREATOR_BOOST: f64 = 15.0;
const FOLLOWED_PARTICIPANT_BOOST: f64 = 5.0;

const CATEGORY_MIX_WEIGHT: f64 = 2.5;
const INTEREST_MIX_WEIGHT: f64 = 2.0;
const ENGAGEMENT_MIX_WEIGHT: f64 = 1.2;
const SOCIAL_MIX_WEIGHT: f64 = 1.0;
const FRESHNESS_MIX_WEIGHT: f64 = 1.5;

/// Normalization offset applied uniformly to every final score; it never
/// affects relative order.
const SCORE_OFFSET: f64 = 10.0;

/// Individual scoring components, kept separate for observability and tests.
#[derive(Debug, Clone, Default)]
pub struct ScoreBreakdown {
    pub category_match: f64,
    pub interest_match: f64,
    pub engagement: f64,
    pub social_relevance: f64,
    pub freshness: f64,
}

impl ScoreBreakdown {
    pub fn final_score(&self) -> f64 {
        self.category_match * CATEGORY_MIX_WEIGHT
            + self.interest_match * INTEREST_MIX_WEIGHT
            + self.engagement * ENGAGEMENT_MIX_WEIGHT
            + self.social_relevance * SOCIAL_MIX_WEIGHT
            + self.freshness * FRESHNESS_MIX_WEIGHT
            + SCORE_OFFSET
    }
}

/// A candidate wrapped with its computed relevance score and matched tags.
///
/// Request-scoped: created during scoring, consumed by sort, diversify, and
/// response shaping, then discarded. Never persisted.
#[derive(Debug, Clone)]
pub struct ScoredDebate {
    pub debate: DebateCandidate,
    pub score: f64,
    pub matched_categories: HashSet<Category>,
    pub matched_interests: HashSet<Interest>,
}

/// True when any subcategory tag on the candidate is on the user's blocklist.
pub fn has_blocked_interest(debate: &DebateCandidate, blocked: &HashSet<Interest>) -> bool {
    debate
        .categories
        .iter()
        .flat_map(|c| c.sub_categories.iter())
        .any(|sub| blocked.contains(sub))
}

/// Score one candidate against the user's preference maps.
pub fn score_candidate(
    debate: DebateCandidate,
    prefs: &PreferenceMaps,
    now: DateTime<Utc>,
) -> ScoredDebate {
    let mut category_match = 0.0;
    let mut interest_match = 0.0;

    let mut matched_categories = HashSet::new();
    let mut matched_interests = HashSet::new();

    for tag in &debate.categories {
        let weight = prefs.category_weights.get(&tag.category).copied().unwrap_or(0);
        if weight > 0 {
            category_match += f64::from(weight) * CATEGORY_TAG_MULTIPLIER;
            matched_categories.insert(tag.category);
        }

        for sub in &tag.sub_categories {
            let interest_weight = prefs.interest_weights.get(sub).copied().unwrap_or(0);
            if interest_weight > 0 {
                interest_match += f64::from(interest_weight) * INTEREST_TAG_MULTIPLIER;
                matched_interests.insert(*sub);
            }
        }
    }

    // ln(1 + x) keeps zero-engagement rooms at exactly 0.
    let engagement = (1.0
        + f64::from(debate.upvotes) * 2.0
        + f64::from(debate.shares)
        + debate.participant_count as f64 * 3.0)
        .ln();

    let mut social_relevance = 0.0;
    if prefs.following.contains(&debate.creator.id) {
        social_relevance += FOLLOWED_CREATOR_BOOST;
    }
    let followed_participants = debate
        .participants
        .iter()
        .filter(|p| prefs.following.contains(&p.user_id))
        .count();
    social_relevance += followed_participants as f64 * FOLLOWED_PARTICIPANT_BOOST;

    // 100 at age zero, strictly decreasing, asymptotically approaching 0.
    let age_in_hours = (now - debate.created_at).num_milliseconds() as f64 / 3_600_000.0;
    let freshness = 100.0 / (1.0 + (age_in_hours / 24.0) * 0.8);

    let breakdown = ScoreBreakdown {
        category_match,
        interest_match,
        engagement,
        social_relevance,
        freshness,
    };

    ScoredDebate {
        score: breakdown.final_score(),
        debate,
        matched_categories,
        matched_interests,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CandidateCategory, CategoryPreference, CreatorSummary, InterestPreference, Participant,
        PreferenceProfile,
    };
    use chrono::Duration;
    use uuid::Uuid;

    fn prefs_with(category_weight: i32, interest_weight: i32) -> PreferenceMaps {
        PreferenceMaps::from_profile(&PreferenceProfile {
            user_id: Uuid::new_v4(),
            blocked_interests: vec![],
            following: vec![],
            categories: vec![CategoryPreference {
                name: Category::ScienceAndTechnology,
                weight: category_weight,
                interests: vec![InterestPreference {
                    name: Interest::Ai,
                    weight: interest_weight,
                }],
            }],
        })
    }

    fn candidate(created_at: DateTime<Utc>) -> DebateCandidate {
        DebateCandidate {
            id: Uuid::new_v4(),
            title: "Will AI replace debate moderators?".into(),
            description: "desc".into(),
            image: None,
            created_at,
            duration: 60,
            upvotes: 0,
            shares: 0,
            creator: CreatorSummary {
                id: Uuid::new_v4(),
                username: "creator".into(),
                image: None,
            },
            categories: vec![CandidateCategory {
                category: Category::ScienceAndTechnology,
                sub_categories: vec![Interest::Ai],
            }],
            participants: vec![],
            participant_count: 0,
        }
    }

    #[test]
    fn worked_example_matches_formula() {
        // Category weight 2, interest weight 3, zero engagement, created now,
        // creator not followed:
        //   categoryMatch = 2*3 = 6, interestMatch = 3*2 = 6,
        //   final = 6*2.5 + 6*2.0 + 0 + 0 + 100*1.5 + 10 = 187
        let now = Utc::now();
        let scored = score_candidate(candidate(now), &prefs_with(2, 3), now);

        assert_eq!(scored.score, 187.0);
        assert!(scored
            .matched_categories
            .contains(&Category::ScienceAndTechnology));
        assert!(scored.matched_interests.contains(&Interest::Ai));
    }

    #[test]
    fn zero_weight_tags_do_not_match() {
        let now = Utc::now();
        let scored = score_candidate(candidate(now), &prefs_with(0, 0), now);

        assert!(scored.matched_categories.is_empty());
        assert!(scored.matched_interests.is_empty());
        // Freshness 100 * 1.5 plus the flat offset only.
        assert_eq!(scored.score, 160.0);
    }

    #[test]
    fn category_score_is_monotonic_in_weight() {
        let now = Utc::now();
        let low = score_candidate(candidate(now), &prefs_with(1, 0), now);
        let high = score_candidate(candidate(now), &prefs_with(2, 0), now);

        assert!(high.score > low.score);
    }

    #[test]
    fn newer_candidates_score_strictly_fresher() {
        let now = Utc::now();
        let prefs = prefs_with(0, 0);

        let fresh = score_candidate(candidate(now - Duration::hours(1)), &prefs, now);
        let stale = score_candidate(candidate(now - Duration::hours(48)), &prefs, now);

        assert!(fresh.score > stale.score);
    }

    #[test]
    fn engagement_uses_log_scaling() {
        let now = Utc::now();
        let prefs = prefs_with(0, 0);

        let mut busy = candidate(now);
        busy.upvotes = 10;
        busy.shares = 5;
        busy.participant_count = 4;

        let scored = score_candidate(busy, &prefs, now);
        // ln(1 + 20 + 5 + 12) = ln(38)
        let expected = 38.0_f64.ln() * 1.2 + 150.0 + 10.0;
        assert!((scored.score - expected).abs() < 1e-9);
    }

    #[test]
    fn followed_creator_and_participants_boost_score() {
        let now = Utc::now();
        let follower = Uuid::new_v4();
        let followed_participant = Uuid::new_v4();

        let mut debate = candidate(now);
        debate.creator.id = follower;
        debate.participants = vec![
            Participant {
                user_id: followed_participant,
                upvotes: 0,
                agreed: None,
            },
            Participant {
                user_id: Uuid::new_v4(),
                upvotes: 0,
                agreed: None,
            },
        ];
        debate.participant_count = 2;

        let prefs = PreferenceMaps::from_profile(&PreferenceProfile {
            user_id: Uuid::new_v4(),
            blocked_interests: vec![],
            following: vec![follower, followed_participant],
            categories: vec![],
        });

        let scored = score_candidate(debate, &prefs, now);
        // 15 (creator) + 5 (one followed participant), engagement ln(7)*1.2,
        // freshness 150, offset 10.
        let expected = 20.0 + 7.0_f64.ln() * 1.2 + 150.0 + 10.0;
        assert!((scored.score - expected).abs() < 1e-9);
    }

    #[test]
    fn blocklist_detection_scans_all_subcategories() {
        let now = Utc::now();
        let mut debate = candidate(now);
        debate.categories.push(CandidateCategory {
            category: Category::SportsAndLeisure,
            sub_categories: vec![Interest::Cricket, Interest::Wwe],
        });

        let blocked: HashSet<Interest> = [Interest::Wwe].into_iter().collect();
        assert!(has_blocked_interest(&debate, &blocked));

        let unrelated: HashSet<Interest> = [Interest::Music].into_iter().collect();
        assert!(!has_blocked_interest(&debate, &unrelated));
    }
}
