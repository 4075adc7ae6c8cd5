use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use validator::Validate;

use crate::app::{
    db,
    domain::{Email, HashedPassword, Password, UserId},
    error::AppError,
    AppState, APP_NAME,
};

/// Login form data from HTTP request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, max = 254), email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub app_name: &'static str,
    pub error: String,
}

fn login_error(msg: impl Into<String>) -> Html<String> {
    let template = LoginTemplate {
        app_name: APP_NAME,
        error: msg.into(),
    };
    Html(template.render().unwrap_or_else(|_| "Template error".to_string()))
}

/// Authenticate a user. Returns the session ID on success.
async fn authenticate(
    pool: &sqlx::SqlitePool,
    email: &Email,
    password: &Password,
) -> Result<String, AppError> {
    let user = db::users::find_by_email(pool, email)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

    let stored_hash = HashedPassword::from_string(user.password_hash);
    stored_hash
        .verify(password)
        .map_err(|_| AppError::Auth("Invalid email or password".to_string()))?;

    let user_id = UserId::from_string(&user.id).map_err(|_| AppError::Internal)?;

    // Session lifetime: 30 days
    let expires_at = OffsetDateTime::now_utc() + Duration::days(30);
    let session_id = db::sessions::create(pool, &user_id, expires_at)
        .await
        .map_err(AppError::Database)?;

    Ok(session_id)
}

/// GET /login — Show login form.
pub async fn show() -> LoginTemplate {
    LoginTemplate {
        app_name: APP_NAME,
        error: String::new(),
    }
}

/// POST /login — Process login form.
pub async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, Html<String>> {
    if form.validate().is_err() {
        return Err(login_error("Invalid form data"));
    }

    let email = match Email::new(form.email) {
        Ok(email) => email,
        Err(_) => return Err(login_error("Invalid email or password")),
    };

    // No strength check at login; we only compare against the stored hash.
    let password = Password::for_verification(form.password);

    match authenticate(&state.db, &email, &password).await {
        Ok(session_id) => Ok((
            jar.add(crate::app::session::session_cookie(session_id)),
            Redirect::to("/hub/clients"),
        )),
        Err(AppError::Auth(msg)) => Err(login_error(msg)),
        Err(_) => Err(login_error("Internal server error")),
    }
}

/// Login routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", get(show).post(submit))
}
