use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::app::ability::{AbilityContext, ClientTarget};
use crate::app::domain::OrganizationId;
use crate::app::features::hub::helpers;
use crate::app::session::AuthenticatedUser;
use crate::app::{db, error::AppError, AppState, APP_NAME};

/// One row on the clients listing.
pub struct ClientRow {
    pub id: String,
    pub name: String,
    pub organization: String,
}

/// Clients listing template.
#[derive(Template)]
#[template(path = "hub/clients_list.html")]
pub struct ClientsListTemplate {
    pub app_name: &'static str,
    pub clients: Vec<ClientRow>,
}

/// GET /hub/clients — Clients the current user may administer.
///
/// Scoping happens in SQL: the accessible-organizations set is passed into
/// the query, so the listing and the per-record check on the detail page
/// agree by construction. Admins additionally see clients not yet assigned
/// to any organization.
pub async fn list(
    AuthenticatedUser(user): AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = AbilityContext::load(&state.db, &user).await?;
    let ability = ctx.ability();

    let clients = if ability.is_admin() {
        db::clients::list_all(&state.db).await?
    } else {
        let organization_ids: Vec<OrganizationId> =
            ability.accessible_organizations().into_iter().collect();
        db::clients::list_in_organizations(&state.db, &organization_ids).await?
    };

    let clients = clients
        .iter()
        .map(|client| ClientRow {
            id: client.id.clone(),
            name: helpers::client_display_name(client),
            organization: helpers::organization_label(&ctx.directory, client.organization_id.as_deref()),
        })
        .collect();

    Ok(ClientsListTemplate {
        app_name: APP_NAME,
        clients,
    })
}

pub struct MessageRow {
    pub label: String,
    pub sent_on: String,
    pub body: String,
}

pub struct NoteRow {
    pub created_on: String,
    pub body: String,
}

pub struct DocumentRow {
    pub display_name: String,
    pub created_on: String,
}

/// Client detail template.
#[derive(Template)]
#[template(path = "hub/client_show.html")]
pub struct ClientShowTemplate {
    pub app_name: &'static str,
    pub client_id: String,
    pub client_name: String,
    pub organization: String,
    pub email: String,
    pub phone_number: String,
    pub can_reassign: bool,
    pub notice: String,
    pub messages: Vec<MessageRow>,
    pub notes: Vec<NoteRow>,
    pub system_notes: Vec<NoteRow>,
    pub documents: Vec<DocumentRow>,
}

#[derive(Deserialize)]
pub struct ShowParams {
    #[serde(default)]
    pub notice: String,
}

fn message_label(message: &db::Message) -> String {
    let direction = match message.direction.parse::<db::MessageDirection>() {
        Ok(db::MessageDirection::Incoming) => "Received",
        Ok(db::MessageDirection::Outgoing) => "Sent",
        Err(_) => "Message",
    };
    format!("{direction} ({})", message.medium)
}

/// GET /hub/clients/:id — One client with their messages, notes and
/// documents. 403 when the ability check denies.
pub async fn show(
    AuthenticatedUser(user): AuthenticatedUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<ShowParams>,
) -> Result<impl IntoResponse, AppError> {
    let client = helpers::load_client(&state.db, &raw_id).await?;
    let ctx = AbilityContext::load(&state.db, &user).await?;
    let ability = ctx.ability();

    if !ability.can_administer(&ClientTarget::new(&client)) {
        return Err(AppError::Forbidden);
    }

    let client_id = crate::app::domain::ClientId::from_string(&client.id)
        .map_err(|_| AppError::NotFound)?;
    let messages = db::messages::list_for_client(&state.db, &client_id).await?;
    let notes = db::notes::list_for_client(&state.db, &client_id).await?;
    let system_notes = db::system_notes::list_for_client(&state.db, &client_id).await?;
    let documents = db::documents::list_for_client(&state.db, &client_id).await?;

    let can_reassign = ability.is_admin()
        || client
            .organization_id
            .as_deref()
            .and_then(|raw| OrganizationId::from_string(raw).ok())
            .is_some_and(|org_id| ability.can_lead(&org_id));

    Ok(ClientShowTemplate {
        app_name: APP_NAME,
        client_id: client.id.clone(),
        client_name: helpers::client_display_name(&client),
        organization: helpers::organization_label(&ctx.directory, client.organization_id.as_deref()),
        email: client.email.clone().unwrap_or_default(),
        phone_number: client.phone_number.clone().unwrap_or_default(),
        can_reassign,
        notice: params.notice,
        messages: messages
            .iter()
            .map(|m| MessageRow {
                label: message_label(m),
                sent_on: helpers::format_date(m.sent_at),
                body: m.body.clone(),
            })
            .collect(),
        notes: notes
            .iter()
            .map(|n| NoteRow {
                created_on: helpers::format_date(n.created_at),
                body: n.body.clone(),
            })
            .collect(),
        system_notes: system_notes
            .iter()
            .map(|n| NoteRow {
                created_on: helpers::format_date(n.created_at),
                body: n.body.clone(),
            })
            .collect(),
        documents: documents
            .iter()
            .map(|d| DocumentRow {
                display_name: d.display_name.clone(),
                created_on: helpers::format_date(d.created_at),
            })
            .collect(),
    })
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hub/clients", get(list))
        .route("/hub/clients/:id", get(show))
}
