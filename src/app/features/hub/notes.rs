use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::post,
    Form, Router,
};
use serde::Deserialize;

use crate::app::ability::{AbilityContext, NoteTarget};
use crate::app::domain::{ClientId, UserId};
use crate::app::features::hub::helpers;
use crate::app::session::AuthenticatedUser;
use crate::app::{db, error::AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub body: String,
}

/// POST /hub/clients/:id/notes — Add a case note to a client.
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect, AppError> {
    let client = helpers::load_client(&state.db, &raw_id).await?;
    let ctx = AbilityContext::load(&state.db, &user).await?;

    if !ctx.ability().can_administer(&NoteTarget::new(&client)) {
        return Err(AppError::Forbidden);
    }

    let body = form.body.trim();
    if body.is_empty() {
        return Ok(back_to_client(&client.id, "Note was empty, nothing saved"));
    }

    let client_id = ClientId::from_string(&client.id).map_err(|_| AppError::NotFound)?;
    let user_id = UserId::from_string(&user.id).map_err(|_| AppError::Internal)?;

    let note = db::NewNote {
        id: ulid::Ulid::new().to_string(),
        client_id,
        user_id,
        body: body.to_string(),
    };
    db::notes::insert(&state.db, &note).await?;

    Ok(back_to_client(&client.id, "Note added"))
}

fn back_to_client(client_id: &str, notice: &str) -> Redirect {
    Redirect::to(&format!(
        "/hub/clients/{client_id}?notice={}",
        urlencoding::encode(notice)
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/hub/clients/:id/notes", post(create))
}
