use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use strum_macros::{Display, EnumString};
use time::OffsetDateTime;

use crate::app::domain::{ClientId, UserId};

/// Whether a message was sent by the org or received from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

/// Transport the message traveled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageMedium {
    Email,
    Sms,
}

/// Database row for messages table. One table holds both directions and
/// both mediums.
#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: String,
    pub client_id: String,
    pub user_id: Option<String>,
    pub direction: String,
    pub medium: String,
    pub body: String,
    pub sent_at: i64,
    pub created_at: i64,
}

/// Data structure for inserting a new message.
pub struct NewMessage {
    pub id: String,
    pub client_id: ClientId,
    pub user_id: Option<UserId>,
    pub direction: MessageDirection,
    pub medium: MessageMedium,
    pub body: String,
    pub sent_at: i64,
}

/// Insert a message.
pub async fn insert<'e, E>(executor: E, message: &NewMessage) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO messages (id, client_id, user_id, direction, medium, body, sent_at, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&message.id)
    .bind(message.client_id.as_str())
    .bind(message.user_id.as_ref().map(|id| id.as_str()))
    .bind(message.direction.to_string())
    .bind(message.medium.to_string())
    .bind(&message.body)
    .bind(message.sent_at)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Messages for a client, oldest first.
pub async fn list_for_client<'e, E>(
    executor: E,
    client_id: &ClientId,
) -> Result<Vec<Message>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE client_id = ? ORDER BY sent_at, id")
        .bind(client_id.as_str())
        .fetch_all(executor)
        .await
}
