use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{ClientId, UserId};

/// Database row for system_notes table. Automated activity records; may be
/// unattached to any client.
#[derive(Debug, Clone, FromRow)]
pub struct SystemNote {
    pub id: String,
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub body: String,
    pub created_at: i64,
}

/// Data structure for inserting a new system note.
pub struct NewSystemNote {
    pub id: String,
    pub client_id: Option<ClientId>,
    pub user_id: Option<UserId>,
    pub body: String,
}

/// Insert a system note.
pub async fn insert<'e, E>(executor: E, note: &NewSystemNote) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO system_notes (id, client_id, user_id, body, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&note.id)
    .bind(note.client_id.as_ref().map(|id| id.as_str()))
    .bind(note.user_id.as_ref().map(|id| id.as_str()))
    .bind(&note.body)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// System notes recorded against a client, oldest first.
pub async fn list_for_client<'e, E>(
    executor: E,
    client_id: &ClientId,
) -> Result<Vec<SystemNote>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, SystemNote>(
        "SELECT * FROM system_notes WHERE client_id = ? ORDER BY created_at, id",
    )
    .bind(client_id.as_str())
    .fetch_all(executor)
    .await
}
