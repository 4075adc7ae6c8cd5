use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use crate::app::ability::{Ability, AbilityContext, OrganizationDirectory};
use crate::app::domain::{ClientId, OrganizationId, UserId};
use crate::app::features::hub::helpers;
use crate::app::session::AuthenticatedUser;
use crate::app::{db, error::AppError, AppState, APP_NAME};

pub struct OrganizationOption {
    pub id: String,
    pub name: String,
}

/// Client reassignment form template.
#[derive(Template)]
#[template(path = "hub/client_organization.html")]
pub struct ClientOrganizationTemplate {
    pub app_name: &'static str,
    pub client_id: String,
    pub client_name: String,
    pub current_organization: String,
    pub error: String,
    pub options: Vec<OrganizationOption>,
}

/// Reassignment is open to admins (any destination) and to users who lead
/// the client's current organization, directly or from an ancestor org.
/// Leads may only move the client somewhere they also lead. A client not
/// yet assigned anywhere can only be placed by an admin.
fn may_reassign(ability: &Ability<'_>, client: &db::Client) -> bool {
    if ability.is_admin() {
        return true;
    }
    client
        .organization_id
        .as_deref()
        .and_then(|raw| OrganizationId::from_string(raw).ok())
        .is_some_and(|org_id| ability.can_lead(&org_id))
}

/// Destinations the current user may move a client to, sorted by name.
fn destination_options(
    ability: &Ability<'_>,
    directory: &OrganizationDirectory,
) -> Vec<OrganizationOption> {
    let mut options: Vec<OrganizationOption> = directory
        .all_ids()
        .filter(|id| ability.is_admin() || ability.can_lead(id))
        .filter_map(|id| directory.get(id))
        .map(|entry| OrganizationOption {
            id: entry.id.as_str(),
            name: entry.name.clone(),
        })
        .collect();
    options.sort_by(|a, b| a.name.cmp(&b.name));
    options
}

/// GET /hub/clients/:id/organization — Show the reassignment form.
pub async fn show(
    AuthenticatedUser(user): AuthenticatedUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let client = helpers::load_client(&state.db, &raw_id).await?;
    let ctx = AbilityContext::load(&state.db, &user).await?;
    let ability = ctx.ability();

    if !may_reassign(&ability, &client) {
        return Err(AppError::Forbidden);
    }

    Ok(ClientOrganizationTemplate {
        app_name: APP_NAME,
        client_id: client.id.clone(),
        client_name: helpers::client_display_name(&client),
        current_organization: helpers::organization_label(&ctx.directory, client.organization_id.as_deref()),
        error: String::new(),
        options: destination_options(&ability, &ctx.directory),
    })
}

#[derive(Debug, Deserialize)]
pub struct ReassignForm {
    pub organization_id: String,
}

/// POST /hub/clients/:id/organization — Move the client and record the
/// move as a system note on their file.
pub async fn submit(
    AuthenticatedUser(user): AuthenticatedUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(form): Form<ReassignForm>,
) -> Result<Response, AppError> {
    let client = helpers::load_client(&state.db, &raw_id).await?;
    let ctx = AbilityContext::load(&state.db, &user).await?;
    let ability = ctx.ability();

    if !may_reassign(&ability, &client) {
        return Err(AppError::Forbidden);
    }

    let form_error = |msg: &str| {
        ClientOrganizationTemplate {
            app_name: APP_NAME,
            client_id: client.id.clone(),
            client_name: helpers::client_display_name(&client),
            current_organization: helpers::organization_label(
                &ctx.directory,
                client.organization_id.as_deref(),
            ),
            error: msg.to_string(),
            options: destination_options(&ability, &ctx.directory),
        }
        .into_response()
    };

    let Ok(destination) = OrganizationId::from_string(form.organization_id.trim()) else {
        return Ok(form_error("Please choose an organization."));
    };
    let Some(destination_entry) = ctx.directory.get(&destination) else {
        return Ok(form_error("That organization no longer exists."));
    };
    if !ability.is_admin() && !ability.can_lead(&destination) {
        return Err(AppError::Forbidden);
    }

    let from_label = helpers::organization_label(&ctx.directory, client.organization_id.as_deref());
    let client_id = ClientId::from_string(&client.id).map_err(|_| AppError::NotFound)?;

    db::clients::update_organization(&state.db, &client_id, Some(&destination)).await?;

    let note = db::NewSystemNote {
        id: ulid::Ulid::new().to_string(),
        client_id: Some(client_id),
        user_id: UserId::from_string(&user.id).ok(),
        body: format!(
            "Client moved from {from_label} to {} by {}",
            destination_entry.name,
            if user.name.is_empty() { &user.email } else { &user.name },
        ),
    };
    db::system_notes::insert(&state.db, &note).await?;

    Ok(Redirect::to(&format!(
        "/hub/clients/{}?notice={}",
        client.id,
        urlencoding::encode("Client moved"),
    ))
    .into_response())
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/hub/clients/:id/organization", get(show).post(submit))
}
