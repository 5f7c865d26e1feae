use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{
    CandidateCategory, Category, CreatorSummary, DebateCandidate, Interest, Participant,
};

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    title: String,
    description: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
    duration: i32,
    upvotes: i32,
    shares: i32,
    creator_id: Uuid,
    creator_username: String,
    creator_image: Option<String>,
}

#[derive(sqlx::FromRow)]
struct CategoryTagRow {
    debate_room_id: Uuid,
    category: Category,
    subcategory: Option<Interest>,
}

#[derive(sqlx::FromRow)]
struct ParticipantRow {
    debate_room_id: Uuid,
    user_id: Uuid,
    upvotes: i32,
    agreed: Option<bool>,
}

/// Fetch one page of rankable debate rooms for a user.
///
/// Filters: active, not soft-deleted, tagged with at least one of the user's
/// categories, and not already joined by the user. The page resumes strictly
/// after the cursor row in `(created_at, id)` descending order.
pub async fn fetch_candidates(
    pool: &PgPool,
    user_id: Uuid,
    categories: &[Category],
    limit: i64,
    cursor: Option<Uuid>,
) -> Result<Vec<DebateCandidate>, sqlx::Error> {
    let rooms = sqlx::query_as::<_, RoomRow>(
        r#"
        SELECT d.id, d.title, d.description, d.image, d.created_at, d.duration,
               d.upvotes, d.shares,
               u.id AS creator_id, u.username AS creator_username, u.image AS creator_image
        FROM debate_rooms d
        JOIN users u ON u.id = d.creator_id
        WHERE d.active = TRUE
          AND d.deleted_at IS NULL
          AND EXISTS (
              SELECT 1 FROM debate_room_categories c
              WHERE c.debate_room_id = d.id AND c.category = ANY($1)
          )
          AND NOT EXISTS (
              SELECT 1 FROM debate_participants p
              WHERE p.debate_room_id = d.id AND p.user_id = $2
          )
          AND ($3::uuid IS NULL OR (d.created_at, d.id) <
               (SELECT created_at, id FROM debate_rooms WHERE id = $3))
        ORDER BY d.created_at DESC, d.id DESC
        LIMIT $4
        "#,
    )
    .bind(categories.to_vec())
    .bind(user_id)
    .bind(cursor)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    if rooms.is_empty() {
        return Ok(Vec::new());
    }

    let room_ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();

    let tag_rows = sqlx::query_as::<_, CategoryTagRow>(
        r#"
        SELECT c.debate_room_id, c.category, s.subcategory
        FROM debate_room_categories c
        LEFT JOIN debate_room_subcategories s ON s.debate_room_category_id = c.id
        WHERE c.debate_room_id = ANY($1)
        ORDER BY c.debate_room_id, c.id
        "#,
    )
    .bind(&room_ids)
    .fetch_all(pool)
    .await?;

    let participant_rows = sqlx::query_as::<_, ParticipantRow>(
        r#"
        SELECT debate_room_id, user_id, upvotes, agreed
        FROM debate_participants
        WHERE debate_room_id = ANY($1)
        "#,
    )
    .bind(&room_ids)
    .fetch_all(pool)
    .await?;

    let mut categories_by_room: HashMap<Uuid, Vec<CandidateCategory>> = HashMap::new();
    for row in tag_rows {
        let tags = categories_by_room.entry(row.debate_room_id).or_default();
        match tags.iter_mut().find(|t| t.category == row.category) {
            Some(tag) => {
                if let Some(sub) = row.subcategory {
                    tag.sub_categories.push(sub);
                }
            }
            None => tags.push(CandidateCategory {
                category: row.category,
                sub_categories: row.subcategory.into_iter().collect(),
            }),
        }
    }

    let mut participants_by_room: HashMap<Uuid, Vec<Participant>> = HashMap::new();
    for row in participant_rows {
        participants_by_room
            .entry(row.debate_room_id)
            .or_default()
            .push(Participant {
                user_id: row.user_id,
                upvotes: row.upvotes,
                agreed: row.agreed,
            });
    }

    Ok(rooms
        .into_iter()
        .map(|room| {
            let participants = participants_by_room.remove(&room.id).unwrap_or_default();
            let participant_count = participants.len() as i64;
            DebateCandidate {
                id: room.id,
                title: room.title,
                description: room.description,
                image: room.image,
                created_at: room.created_at,
                duration: room.duration,
                upvotes: room.upvotes,
                shares: room.shares,
                creator: CreatorSummary {
                    id: room.creator_id,
                    username: room.creator_username,
                    image: room.creator_image,
                },
                categories: categories_by_room.remove(&room.id).unwrap_or_default(),
                participants,
                participant_count,
            }
        })
        .collect())
}

/// Total count of active rooms matching the user's categories.
///
/// The count intentionally does not apply the participant exclusion used by
/// the page query, so it can exceed the number of rooms the user can still
/// explore.
pub async fn count_candidates(
    pool: &PgPool,
    categories: &[Category],
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM debate_rooms d
        WHERE d.active = TRUE
          AND d.deleted_at IS NULL
          AND EXISTS (
              SELECT 1 FROM debate_room_categories c
              WHERE c.debate_room_id = d.id AND c.category = ANY($1)
          )
        "#,
    )
    .bind(categories.to_vec())
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}
