//! Data models for the debate feed service.
//!
//! Defines the closed category/interest taxonomy, the per-user preference
//! profile read from storage, the debate candidate shape consumed by the
//! ranking pipeline, and the wire-format response envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level debate categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "category_enum", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    PoliticsAndGovernance,
    EconomyAndDevelopment,
    LawAndJustice,
    Education,
    EnvironmentAndSustainability,
    SocialIssues,
    ScienceAndTechnology,
    EntertainmentAndMedia,
    SportsAndLeisure,
}

impl sqlx::postgres::PgHasArrayType for Category {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_category_enum")
    }
}

/// Interests (subcategories) nested under the top-level categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "interest_enum", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interest {
    // Politics and Governance
    Elections,
    GovernmentPolicy,
    InternationalRelations,
    PoliticalStrategies,

    // Economy and Development
    Economy,
    BusinessTrends,
    GlobalTrade,
    InnovationInBusiness,

    // Law and Justice
    LegalSystem,
    CriminalJustice,
    CivilRights,
    CourtDecisions,

    // Education
    EducationalPolicy,
    LearningTechniques,
    SchoolReforms,

    // Environment and Sustainability
    ClimateChange,
    EnvironmentalPolicy,
    SustainableLiving,
    RenewableEnergy,

    // Social Issues
    SocialEquality,
    CommunityDevelopment,
    CulturalDiversity,
    HumanRights,

    // Science and Technology
    WebDevelopment,
    SoftwareEngineering,
    Ai,
    TechInnovation,
    Cybersecurity,
    Robotics,
    DataScience,
    MobileTechnology,

    // Entertainment and Media
    FilmAndTv,
    Music,
    Journalism,
    DigitalMedia,
    LiteratureAndTheatre,

    // Sports and Leisure
    Cricket,
    Ipl,
    Wwe,
    SportsGeneral,
    Fitness,
    Football,
    Basketball,
    Tennis,
    FormulaOne,
}

impl sqlx::postgres::PgHasArrayType for Interest {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_interest_enum")
    }
}

/// A user's stored affinity for one category, with its nested interests.
#[derive(Debug, Clone)]
pub struct CategoryPreference {
    pub name: Category,
    pub weight: i32,
    pub interests: Vec<InterestPreference>,
}

/// A user's stored affinity for one interest.
#[derive(Debug, Clone)]
pub struct InterestPreference {
    pub name: Interest,
    pub weight: i32,
}

/// Everything the ranking pipeline needs to know about the requesting user.
///
/// Built fresh per request from current stored preferences; the pipeline
/// never writes any of these fields back.
#[derive(Debug, Clone)]
pub struct PreferenceProfile {
    pub user_id: Uuid,
    pub blocked_interests: Vec<Interest>,
    pub following: Vec<Uuid>,
    pub categories: Vec<CategoryPreference>,
}

/// Creator summary attached to each candidate and echoed in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorSummary {
    pub id: Uuid,
    pub username: String,
    pub image: Option<String>,
}

/// One category tag on a debate room with its subcategory tags.
#[derive(Debug, Clone)]
pub struct CandidateCategory {
    pub category: Category,
    pub sub_categories: Vec<Interest>,
}

/// A debate room participant as seen by the feed.
///
/// `agreed` is tri-state: agreed, disagreed, or no stance recorded yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: Uuid,
    pub upvotes: i32,
    pub agreed: Option<bool>,
}

/// A debate room eligible for ranking, as retrieved from storage.
#[derive(Debug, Clone)]
pub struct DebateCandidate {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub duration: i32,
    pub upvotes: i32,
    pub shares: i32,
    pub creator: CreatorSummary,
    pub categories: Vec<CandidateCategory>,
    pub participants: Vec<Participant>,
    pub participant_count: i64,
}

/// One feed item in the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedDebate {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub duration: i32,
    pub upvotes: i32,
    pub shares: i32,
    pub participants: Vec<Participant>,
    pub participant_count: i64,
    pub agreed_count: usize,
    pub disagreed_count: usize,
    #[serde(rename = "vote_count")]
    pub vote_count: usize,
    pub creator: CreatorSummary,
    pub categories: Vec<Category>,
    pub sub_categories: Vec<Interest>,
}

/// Pagination metadata returned alongside the feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_count: i64,
    pub page: u32,
    pub limit: u32,
    pub has_next_page: bool,
    pub next_cursor: Option<Uuid>,
}

/// Full feed response envelope. This is also the cache value type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub data: Vec<ProjectedDebate>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Category::ScienceAndTechnology).unwrap();
        assert_eq!(json, "\"SCIENCE_AND_TECHNOLOGY\"");

        let back: Category = serde_json::from_str("\"SPORTS_AND_LEISURE\"").unwrap();
        assert_eq!(back, Category::SportsAndLeisure);
    }

    #[test]
    fn interest_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Interest::Ai).unwrap();
        assert_eq!(json, "\"AI\"");

        let back: Interest = serde_json::from_str("\"FORMULA_ONE\"").unwrap();
        assert_eq!(back, Interest::FormulaOne);
    }

    #[test]
    fn projected_debate_uses_original_wire_keys() {
        let item = ProjectedDebate {
            id: Uuid::new_v4(),
            title: "t".into(),
            description: "d".into(),
            image: None,
            created_at: Utc::now(),
            duration: 60,
            upvotes: 0,
            shares: 0,
            participants: vec![],
            participant_count: 0,
            agreed_count: 0,
            disagreed_count: 0,
            vote_count: 0,
            creator: CreatorSummary {
                id: Uuid::new_v4(),
                username: "u".into(),
                image: None,
            },
            categories: vec![],
            sub_categories: vec![],
        };

        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("participantCount").is_some());
        assert!(value.get("agreedCount").is_some());
        assert!(value.get("disagreedCount").is_some());
        // Retained verbatim from the original wire format.
        assert!(value.get("vote_count").is_some());
        assert!(value.get("subCategories").is_some());
    }
}
