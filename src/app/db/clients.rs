use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{ClientId, Email, OrganizationId, PhoneNumber};

/// Database row for clients table.
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: String,
    pub organization_id: Option<String>,
    pub legal_name: String,
    pub preferred_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new client.
pub struct NewClient {
    pub id: ClientId,
    pub organization_id: Option<OrganizationId>,
    pub legal_name: String,
    pub preferred_name: String,
    pub email: Option<Email>,
    pub phone_number: Option<PhoneNumber>,
}

/// Find a client by ID.
pub async fn find_by_id<'e, E>(executor: E, client_id: &ClientId) -> Result<Option<Client>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
        .bind(client_id.as_str())
        .fetch_optional(executor)
        .await
}

/// Insert a new client.
pub async fn insert<'e, E>(executor: E, client: &NewClient) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO clients (id, organization_id, legal_name, preferred_name, email, phone_number, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(client.id.as_str())
    .bind(client.organization_id.as_ref().map(|id| id.as_str()))
    .bind(&client.legal_name)
    .bind(&client.preferred_name)
    .bind(client.email.as_ref().map(|e| e.as_str()))
    .bind(client.phone_number.as_ref().map(|p| p.as_str()))
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Every client, including ones not yet assigned to an organization.
/// Admin listings only.
pub async fn list_all(pool: &sqlx::SqlitePool) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY legal_name")
        .fetch_all(pool)
        .await
}

/// Clients whose organization is one of the given ids. Listing screens pass
/// the caller's accessible organizations here so scoping happens in SQL.
pub async fn list_in_organizations(
    pool: &sqlx::SqlitePool,
    organization_ids: &[OrganizationId],
) -> Result<Vec<Client>, sqlx::Error> {
    if organization_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; organization_ids.len()].join(", ");
    let sql = format!(
        "SELECT * FROM clients WHERE organization_id IN ({placeholders}) ORDER BY legal_name"
    );

    let mut query = sqlx::query_as::<_, Client>(&sql);
    for id in organization_ids {
        query = query.bind(id.as_str());
    }
    query.fetch_all(pool).await
}

/// Move a client to a different organization (or detach it).
pub async fn update_organization<'e, E>(
    executor: E,
    client_id: &ClientId,
    organization_id: Option<&OrganizationId>,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query("UPDATE clients SET organization_id = ?, updated_at = ? WHERE id = ?")
        .bind(organization_id.map(|id| id.as_str()))
        .bind(now)
        .bind(client_id.as_str())
        .execute(executor)
        .await?;
    Ok(())
}
