use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// Ensure the Postgres enum types and tables this service reads exist.
///
/// These tables are owned by the wider platform; we lazily create them at
/// service startup to unblock environments where migrations have not been
/// applied yet (fresh developer machines, CI spins).
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    info!("Ensuring debate feed tables exist");

    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
DO $$ BEGIN
    CREATE TYPE category_enum AS ENUM (
        'POLITICS_AND_GOVERNANCE',
        'ECONOMY_AND_DEVELOPMENT',
        'LAW_AND_JUSTICE',
        'EDUCATION',
        'ENVIRONMENT_AND_SUSTAINABILITY',
        'SOCIAL_ISSUES',
        'SCIENCE_AND_TECHNOLOGY',
        'ENTERTAINMENT_AND_MEDIA',
        'SPORTS_AND_LEISURE'
    );
EXCEPTION WHEN duplicate_object THEN NULL;
END $$
"#,
    r#"
DO $$ BEGIN
    CREATE TYPE interest_enum AS ENUM (
        'ELECTIONS', 'GOVERNMENT_POLICY', 'INTERNATIONAL_RELATIONS', 'POLITICAL_STRATEGIES',
        'ECONOMY', 'BUSINESS_TRENDS', 'GLOBAL_TRADE', 'INNOVATION_IN_BUSINESS',
        'LEGAL_SYSTEM', 'CRIMINAL_JUSTICE', 'CIVIL_RIGHTS', 'COURT_DECISIONS',
        'EDUCATIONAL_POLICY', 'LEARNING_TECHNIQUES', 'SCHOOL_REFORMS',
        'CLIMATE_CHANGE', 'ENVIRONMENTAL_POLICY', 'SUSTAINABLE_LIVING', 'RENEWABLE_ENERGY',
        'SOCIAL_EQUALITY', 'COMMUNITY_DEVELOPMENT', 'CULTURAL_DIVERSITY', 'HUMAN_RIGHTS',
        'WEB_DEVELOPMENT', 'SOFTWARE_ENGINEERING', 'AI', 'TECH_INNOVATION',
        'CYBERSECURITY', 'ROBOTICS', 'DATA_SCIENCE', 'MOBILE_TECHNOLOGY',
        'FILM_AND_TV', 'MUSIC', 'JOURNALISM', 'DIGITAL_MEDIA', 'LITERATURE_AND_THEATRE',
        'CRICKET', 'IPL', 'WWE', 'SPORTS_GENERAL', 'FITNESS',
        'FOOTBALL', 'BASKETBALL', 'TENNIS', 'FORMULA_ONE'
    );
EXCEPTION WHEN duplicate_object THEN NULL;
END $$
"#,
    r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    external_id TEXT NOT NULL UNIQUE,
    username TEXT NOT NULL,
    image TEXT,
    blocked_interests interest_enum[] NOT NULL DEFAULT '{}',
    following UUID[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS user_categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name category_enum NOT NULL,
    weight INT NOT NULL DEFAULT 1,
    UNIQUE (user_id, name)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS user_interests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    category_id UUID NOT NULL REFERENCES user_categories(id) ON DELETE CASCADE,
    name interest_enum NOT NULL,
    weight INT NOT NULL DEFAULT 1,
    UNIQUE (category_id, name)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS debate_rooms (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    image TEXT,
    duration INT NOT NULL,
    upvotes INT NOT NULL DEFAULT 0,
    shares INT NOT NULL DEFAULT 0,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    deleted_at TIMESTAMPTZ,
    creator_id UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS debate_room_categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    debate_room_id UUID NOT NULL REFERENCES debate_rooms(id) ON DELETE CASCADE,
    category category_enum NOT NULL,
    UNIQUE (debate_room_id, category)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS debate_room_subcategories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    debate_room_category_id UUID NOT NULL REFERENCES debate_room_categories(id) ON DELETE CASCADE,
    subcategory interest_enum NOT NULL,
    UNIQUE (debate_room_category_id, subcategory)
)
"#,
    // ai_score / ai_flagged are written by the external opinion-scoring
    // pipeline; this service only carries the columns.
    r#"
CREATE TABLE IF NOT EXISTS debate_participants (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    debate_room_id UUID NOT NULL REFERENCES debate_rooms(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    upvotes INT NOT NULL DEFAULT 0,
    agreed BOOLEAN,
    opinion TEXT,
    ai_score DOUBLE PRECISION,
    ai_flagged BOOLEAN,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (debate_room_id, user_id)
)
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_debate_rooms_active_created
    ON debate_rooms (created_at DESC, id DESC)
    WHERE active = TRUE AND deleted_at IS NULL
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_debate_room_categories_room
    ON debate_room_categories (debate_room_id)
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_debate_participants_room
    ON debate_participants (debate_room_id)
"#,
];
