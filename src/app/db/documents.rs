use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{ClientId, UserId};

/// Database row for documents table. Metadata only; file storage lives
/// outside this app.
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: String,
    pub client_id: String,
    pub uploaded_by: Option<String>,
    pub display_name: String,
    pub content_type: String,
    pub created_at: i64,
}

/// Data structure for inserting a new document record.
pub struct NewDocument {
    pub id: String,
    pub client_id: ClientId,
    pub uploaded_by: Option<UserId>,
    pub display_name: String,
    pub content_type: String,
}

/// Insert a document record.
pub async fn insert<'e, E>(executor: E, document: &NewDocument) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO documents (id, client_id, uploaded_by, display_name, content_type, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&document.id)
    .bind(document.client_id.as_str())
    .bind(document.uploaded_by.as_ref().map(|id| id.as_str()))
    .bind(&document.display_name)
    .bind(&document.content_type)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Documents for a client, oldest first.
pub async fn list_for_client<'e, E>(
    executor: E,
    client_id: &ClientId,
) -> Result<Vec<Document>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Document>(
        "SELECT * FROM documents WHERE client_id = ? ORDER BY created_at, id",
    )
    .bind(client_id.as_str())
    .fetch_all(executor)
    .await
}
