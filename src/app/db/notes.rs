use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{ClientId, UserId};

/// Database row for notes table. Notes are always attached to a client.
#[derive(Debug, Clone, FromRow)]
pub struct Note {
    pub id: String,
    pub client_id: String,
    pub user_id: String,
    pub body: String,
    pub created_at: i64,
}

/// Data structure for inserting a new note.
pub struct NewNote {
    pub id: String,
    pub client_id: ClientId,
    pub user_id: UserId,
    pub body: String,
}

/// Insert a note.
pub async fn insert<'e, E>(executor: E, note: &NewNote) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query("INSERT INTO notes (id, client_id, user_id, body, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&note.id)
        .bind(note.client_id.as_str())
        .bind(note.user_id.as_str())
        .bind(&note.body)
        .bind(now)
        .execute(executor)
        .await?;
    Ok(())
}

/// Notes for a client, oldest first.
pub async fn list_for_client<'e, E>(
    executor: E,
    client_id: &ClientId,
) -> Result<Vec<Note>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE client_id = ? ORDER BY created_at, id")
        .bind(client_id.as_str())
        .fetch_all(executor)
        .await
}
