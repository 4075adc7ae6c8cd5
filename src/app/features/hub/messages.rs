use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::app::ability::{AbilityContext, MessageTarget};
use crate::app::domain::{ClientId, UserId};
use crate::app::features::hub::helpers;
use crate::app::session::AuthenticatedUser;
use crate::app::{db, error::AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub body: String,
}

/// POST /hub/clients/:id/messages — Send an outgoing message to a client.
///
/// The transport follows the client's contact info: SMS when we have a
/// phone number, email otherwise. A blank body creates nothing and just
/// bounces back to the client page.
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(form): Form<MessageForm>,
) -> Result<Redirect, AppError> {
    let client = helpers::load_client(&state.db, &raw_id).await?;
    let ctx = AbilityContext::load(&state.db, &user).await?;

    if !ctx.ability().can_administer(&MessageTarget::new(&client)) {
        return Err(AppError::Forbidden);
    }

    let body = form.body.trim();
    if body.is_empty() {
        return Ok(back_to_client(&client.id, "Message was empty, nothing sent"));
    }

    let client_id = ClientId::from_string(&client.id).map_err(|_| AppError::NotFound)?;
    let medium = if client.phone_number.is_some() {
        db::MessageMedium::Sms
    } else {
        db::MessageMedium::Email
    };

    let message = db::NewMessage {
        id: ulid::Ulid::new().to_string(),
        client_id,
        user_id: UserId::from_string(&user.id).ok(),
        direction: db::MessageDirection::Outgoing,
        medium,
        body: body.to_string(),
        sent_at: OffsetDateTime::now_utc().unix_timestamp(),
    };
    db::messages::insert(&state.db, &message).await?;

    Ok(back_to_client(&client.id, "Message sent"))
}

fn back_to_client(client_id: &str, notice: &str) -> Redirect {
    Redirect::to(&format!(
        "/hub/clients/{client_id}?notice={}",
        urlencoding::encode(notice)
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/hub/clients/:id/messages", post(create))
}
