use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::OrganizationId;

/// Database row for organizations table.
#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new organization.
pub struct NewOrganization {
    pub id: OrganizationId,
    pub name: String,
    pub parent_id: Option<OrganizationId>,
}

/// Load every organization. The in-memory directory is built from this.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>("SELECT * FROM organizations ORDER BY name")
        .fetch_all(executor)
        .await
}

/// Insert a new organization.
pub async fn insert<'e, E>(executor: E, organization: &NewOrganization) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query("INSERT INTO organizations (id, name, parent_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)")
        .bind(organization.id.as_str())
        .bind(&organization.name)
        .bind(organization.parent_id.as_ref().map(|id| id.as_str()))
        .bind(now)
        .bind(now)
        .execute(executor)
        .await?;
    Ok(())
}
