use sqlx::SqliteExecutor;
use time::OffsetDateTime;

use crate::app::domain::{OrganizationId, UserId};

/// Grant a user oversight of an organization they are not a member of.
pub async fn add<'e, E>(
    executor: E,
    user_id: &UserId,
    organization_id: &OrganizationId,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO supported_organizations (user_id, organization_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(user_id.as_str())
    .bind(organization_id.as_str())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Organization ids a user supports.
pub async fn list_for_user<'e, E>(executor: E, user_id: &UserId) -> Result<Vec<String>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar("SELECT organization_id FROM supported_organizations WHERE user_id = ?")
        .bind(user_id.as_str())
        .fetch_all(executor)
        .await
}

/// Remove every grant for a user. Used when an admin replaces the set.
pub async fn clear_for_user<'e, E>(executor: E, user_id: &UserId) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM supported_organizations WHERE user_id = ?")
        .bind(user_id.as_str())
        .execute(executor)
        .await?;
    Ok(())
}
