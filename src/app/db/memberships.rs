use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{MembershipRole, OrganizationId, UserId};

/// Database row for memberships table.
#[derive(Debug, Clone, FromRow)]
pub struct Membership {
    pub organization_id: String,
    pub user_id: String,
    pub role: String,
    pub created_at: i64,
}

/// Add a user to an organization with a specific role.
pub async fn add<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    user_id: &UserId,
    role: MembershipRole,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO memberships (organization_id, user_id, role, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(organization_id.as_str())
    .bind(user_id.as_str())
    .bind(role.to_string())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// All memberships held by a user.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: &UserId,
) -> Result<Vec<Membership>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Membership>("SELECT * FROM memberships WHERE user_id = ?")
        .bind(user_id.as_str())
        .fetch_all(executor)
        .await
}
