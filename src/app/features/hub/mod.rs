//! The hub: the signed-in side of the app where volunteers work client
//! cases. Every handler loads an [`crate::app::ability::Ability`] for the
//! current user and checks it before touching client data.

pub mod clients;
pub mod client_organization;
pub mod helpers;
pub mod messages;
pub mod notes;
pub mod organizations;
pub mod users;

use axum::Router;

use crate::app::AppState;

/// Hub routes. All of them require a signed-in user.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(clients::routes())
        .merge(client_organization::routes())
        .merge(messages::routes())
        .merge(notes::routes())
        .merge(organizations::routes())
        .merge(users::routes())
}
