use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    Category, CategoryPreference, Interest, InterestPreference, PreferenceProfile,
};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    blocked_interests: Vec<Interest>,
    following: Vec<Uuid>,
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: Category,
    weight: i32,
}

#[derive(sqlx::FromRow)]
struct InterestRow {
    category_id: Uuid,
    name: Interest,
    weight: i32,
}

/// Load a user's preference profile (category/interest weights, blocklist,
/// following set) by external identity.
///
/// Returns `None` when no user record exists for the identity.
pub async fn find_preference_profile(
    pool: &PgPool,
    external_id: &str,
) -> Result<Option<PreferenceProfile>, sqlx::Error> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, blocked_interests, following
        FROM users
        WHERE external_id = $1
        "#,
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await?;

    let Some(user) = user else {
        return Ok(None);
    };

    let category_rows = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, name, weight
        FROM user_categories
        WHERE user_id = $1
        ORDER BY name
        "#,
    )
    .bind(user.id)
    .fetch_all(pool)
    .await?;

    let category_ids: Vec<Uuid> = category_rows.iter().map(|c| c.id).collect();

    let interest_rows = sqlx::query_as::<_, InterestRow>(
        r#"
        SELECT category_id, name, weight
        FROM user_interests
        WHERE category_id = ANY($1)
        ORDER BY name
        "#,
    )
    .bind(&category_ids)
    .fetch_all(pool)
    .await?;

    let categories = category_rows
        .into_iter()
        .map(|cat| CategoryPreference {
            name: cat.name,
            weight: cat.weight,
            interests: interest_rows
                .iter()
                .filter(|i| i.category_id == cat.id)
                .map(|i| InterestPreference {
                    name: i.name,
                    weight: i.weight,
                })
                .collect(),
        })
        .collect();

    Ok(Some(PreferenceProfile {
        user_id: user.id,
        blocked_interests: user.blocked_interests,
        following: user.following,
        categories,
    }))
}
