use askama::Template;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::app::ability::{AbilityContext, OrganizationTarget};
use crate::app::domain::OrganizationId;
use crate::app::session::AuthenticatedUser;
use crate::app::{db, error::AppError, AppState, APP_NAME};

pub struct OrganizationRow {
    pub id: String,
    pub name: String,
    pub parent: String,
}

/// Organizations listing template.
#[derive(Template)]
#[template(path = "hub/organizations.html")]
pub struct OrganizationsTemplate {
    pub app_name: &'static str,
    pub is_admin: bool,
    pub notice: String,
    pub organizations: Vec<OrganizationRow>,
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub notice: String,
}

/// GET /hub/organizations — Organizations in the current user's scope.
/// Admins see every organization and get the creation form.
pub async fn list(
    AuthenticatedUser(user): AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = AbilityContext::load(&state.db, &user).await?;
    let ability = ctx.ability();
    let accessible = ability.accessible_organizations();

    let mut organizations: Vec<OrganizationRow> = accessible
        .iter()
        .filter_map(|id| ctx.directory.get(id))
        .map(|entry| OrganizationRow {
            id: entry.id.as_str(),
            name: entry.name.clone(),
            parent: entry
                .parent_id
                .as_ref()
                .and_then(|p| ctx.directory.get(p))
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        })
        .collect();
    organizations.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(OrganizationsTemplate {
        app_name: APP_NAME,
        is_admin: ability.is_admin(),
        notice: params.notice,
        organizations,
    })
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    pub parent_id: String,
}

/// POST /hub/organizations — Create an organization, optionally under a
/// parent. Organizations themselves are admin-only targets, so the gate is
/// the ability check against a bare organization.
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(state): State<AppState>,
    Form(form): Form<CreateOrganizationForm>,
) -> Result<Response, AppError> {
    let ctx = AbilityContext::load(&state.db, &user).await?;
    let ability = ctx.ability();

    if !ability.can_administer(&OrganizationTarget) {
        return Err(AppError::Forbidden);
    }
    if form.validate().is_err() {
        return Err(AppError::Validation("Name must be 1–255 characters".to_string()));
    }

    let parent_id = match form.parent_id.trim() {
        "" => None,
        raw => {
            let id = OrganizationId::from_string(raw)
                .map_err(|_| AppError::Validation("Unknown parent organization".to_string()))?;
            if !ctx.directory.contains(&id) {
                return Err(AppError::Validation("Unknown parent organization".to_string()));
            }
            Some(id)
        }
    };

    let organization = db::NewOrganization {
        id: OrganizationId::new(),
        name: form.name.trim().to_string(),
        parent_id,
    };
    db::organizations::insert(&state.db, &organization).await?;

    Ok(Redirect::to(&format!(
        "/hub/organizations?notice={}",
        urlencoding::encode("Organization created"),
    ))
    .into_response())
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/hub/organizations", get(list).post(create))
}
