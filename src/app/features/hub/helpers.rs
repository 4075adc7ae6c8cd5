use time::OffsetDateTime;

use crate::app::ability::OrganizationDirectory;
use crate::app::domain::{ClientId, OrganizationId};
use crate::app::{db, error::AppError};

/// Load a client by raw path id. Malformed ids and missing rows are both 404.
pub async fn load_client(pool: &sqlx::SqlitePool, raw_id: &str) -> Result<db::Client, AppError> {
    let client_id = ClientId::from_string(raw_id).map_err(|_| AppError::NotFound)?;
    db::clients::find_by_id(pool, &client_id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Display label for an organization reference on hub screens.
pub fn organization_label(directory: &OrganizationDirectory, organization_id: Option<&str>) -> String {
    organization_id
        .and_then(|raw| OrganizationId::from_string(raw).ok())
        .and_then(|id| directory.get(&id).map(|entry| entry.name.clone()))
        .unwrap_or_else(|| "No organization".to_string())
}

/// Render a unix timestamp as a calendar date for hub screens.
pub fn format_date(ts: i64) -> String {
    match OffsetDateTime::from_unix_timestamp(ts) {
        Ok(dt) => dt.date().to_string(),
        Err(_) => String::new(),
    }
}

/// Name a client goes by on hub screens: the preferred name when one was
/// recorded, the legal name otherwise.
pub fn client_display_name(client: &db::Client) -> String {
    if client.preferred_name.is_empty() {
        client.legal_name.clone()
    } else {
        client.preferred_name.clone()
    }
}

/// Human label for a stored membership role. Unrecognized strings pass
/// through unchanged so admins can spot bad data.
pub fn role_label(role: &str) -> String {
    match role.parse::<crate::app::domain::MembershipRole>() {
        Ok(crate::app::domain::MembershipRole::Lead) => "Organization lead".to_string(),
        Ok(crate::app::domain::MembershipRole::Member) => "Member".to_string(),
        Err(_) => role.to_string(),
    }
}
