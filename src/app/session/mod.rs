use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::app::{db, domain::UserId, AppState};

pub fn session_cookie(session_id: impl Into<String>) -> Cookie<'static> {
    Cookie::build(("session_id", session_id.into()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(("session_id", ""))
        .path("/")
        .removal()
        .into()
}

/// Extractor for the signed-in user. Requests without a valid session are
/// redirected to the login page.
pub struct AuthenticatedUser(pub db::User);

#[async_trait::async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get("session_id") else {
            return Err(Redirect::to("/login").into_response());
        };

        let session = db::sessions::find_valid(&state.db, cookie.value())
            .await
            .map_err(|err| {
                tracing::error!(%err, "session lookup failed");
                Redirect::to("/login").into_response()
            })?
            .ok_or_else(|| Redirect::to("/login").into_response())?;

        let user_id = UserId::from_string(&session.user_id)
            .map_err(|_| Redirect::to("/login").into_response())?;

        let user = db::users::find_by_id(&state.db, &user_id)
            .await
            .map_err(|err| {
                tracing::error!(%err, "user lookup failed");
                Redirect::to("/login").into_response()
            })?
            .ok_or_else(|| Redirect::to("/login").into_response())?;

        Ok(AuthenticatedUser(user))
    }
}
