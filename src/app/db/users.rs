use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{Email, HashedPassword, OrganizationId, PhoneNumber, Timezone, UserId};

/// Database row for users table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub timezone: String,
    pub is_admin: bool,
    pub organization_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new user.
pub struct NewUser {
    pub id: UserId,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub name: String,
    pub is_admin: bool,
    pub organization_id: Option<OrganizationId>,
}

/// Find a user by email address.
pub async fn find_by_email(
    pool: &sqlx::SqlitePool,
    email: &Email,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await
}

/// Find a user by ID.
pub async fn find_by_id<'e, E>(executor: E, user_id: &UserId) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id.as_str())
        .fetch_optional(executor)
        .await
}

/// Insert a new user into the database.
pub async fn insert<'e, E>(executor: E, user: &NewUser) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, name, is_admin, organization_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id.as_str())
    .bind(user.email.as_str())
    .bind(user.password_hash.as_str())
    .bind(&user.name)
    .bind(user.is_admin)
    .bind(user.organization_id.as_ref().map(|id| id.as_str()))
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Update the fields a user may edit about themselves.
pub async fn update_profile<'e, E>(
    executor: E,
    user_id: &UserId,
    name: &str,
    phone_number: Option<&PhoneNumber>,
    timezone: &Timezone,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query("UPDATE users SET name = ?, phone_number = ?, timezone = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(phone_number.map(|p| p.as_str()))
        .bind(timezone.as_str())
        .bind(now)
        .bind(user_id.as_str())
        .execute(executor)
        .await?;
    Ok(())
}

/// Set or clear the global admin flag.
pub async fn set_admin<'e, E>(executor: E, user_id: &UserId, is_admin: bool) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query("UPDATE users SET is_admin = ?, updated_at = ? WHERE id = ?")
        .bind(is_admin)
        .bind(now)
        .bind(user_id.as_str())
        .execute(executor)
        .await?;
    Ok(())
}
