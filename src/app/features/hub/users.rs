use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::app::ability::AbilityContext;
use crate::app::domain::{OrganizationId, PhoneNumber, Timezone, UserId, SUPPORTED_TIMEZONES};
use crate::app::features::hub::helpers;
use crate::app::session::AuthenticatedUser;
use crate::app::{db, error::AppError, AppState, APP_NAME};

pub struct MembershipRow {
    pub organization: String,
    pub role: String,
}

/// Profile page template.
#[derive(Template)]
#[template(path = "hub/profile.html")]
pub struct ProfileTemplate {
    pub app_name: &'static str,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub timezone: String,
    pub phone_number: String,
    pub memberships: Vec<MembershipRow>,
    pub supported: Vec<String>,
}

/// GET /hub/profile — The current user's own profile.
pub async fn profile(
    AuthenticatedUser(user): AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = AbilityContext::load(&state.db, &user).await?;

    let (memberships, supported) = match UserId::from_string(&user.id) {
        Ok(user_id) => (
            db::memberships::list_for_user(&state.db, &user_id).await?,
            db::supported_organizations::list_for_user(&state.db, &user_id).await?,
        ),
        Err(_) => (Vec::new(), Vec::new()),
    };

    Ok(ProfileTemplate {
        app_name: APP_NAME,
        user_id: user.id.clone(),
        name: if user.name.is_empty() { user.email.clone() } else { user.name.clone() },
        email: user.email.clone(),
        organization: helpers::organization_label(&ctx.directory, user.organization_id.as_deref()),
        timezone: user.timezone.clone(),
        phone_number: user.phone_number.clone().unwrap_or_default(),
        memberships: memberships
            .iter()
            .map(|m| MembershipRow {
                organization: helpers::organization_label(&ctx.directory, Some(&m.organization_id)),
                role: helpers::role_label(&m.role),
            })
            .collect(),
        supported: supported
            .iter()
            .map(|raw| helpers::organization_label(&ctx.directory, Some(raw)))
            .collect(),
    })
}

pub struct TimezoneOption {
    pub name: String,
    pub selected: bool,
}

pub struct SupportOption {
    pub id: String,
    pub name: String,
    pub checked: bool,
}

/// Profile edit form template.
#[derive(Template)]
#[template(path = "hub/user_edit.html")]
pub struct UserEditTemplate {
    pub app_name: &'static str,
    pub target_id: String,
    pub target_name: String,
    pub target_is_admin: bool,
    pub editor_is_admin: bool,
    pub notice: String,
    pub error: String,
    pub name: String,
    pub phone_number: String,
    pub timezones: Vec<TimezoneOption>,
    pub supportable: Vec<SupportOption>,
}

/// Only the user themselves or a global admin may open the edit form.
fn may_edit(editor: &db::User, target: &db::User) -> bool {
    editor.is_admin || editor.id == target.id
}

async fn load_target(pool: &sqlx::SqlitePool, raw_id: &str) -> Result<db::User, AppError> {
    let user_id = UserId::from_string(raw_id).map_err(|_| AppError::NotFound)?;
    db::users::find_by_id(pool, &user_id)
        .await?
        .ok_or(AppError::NotFound)
}

async fn edit_template(
    state: &AppState,
    ctx: &AbilityContext,
    editor: &db::User,
    target: &db::User,
    notice: String,
    error: String,
) -> Result<UserEditTemplate, AppError> {
    let supported: Vec<String> = match UserId::from_string(&target.id) {
        Ok(user_id) => db::supported_organizations::list_for_user(&state.db, &user_id).await?,
        Err(_) => Vec::new(),
    };

    let mut supportable: Vec<SupportOption> = ctx
        .directory
        .all_ids()
        .filter_map(|id| ctx.directory.get(id))
        .map(|entry| SupportOption {
            id: entry.id.as_str(),
            name: entry.name.clone(),
            checked: supported.contains(&entry.id.as_str()),
        })
        .collect();
    supportable.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(UserEditTemplate {
        app_name: APP_NAME,
        target_id: target.id.clone(),
        target_name: if target.name.is_empty() { target.email.clone() } else { target.name.clone() },
        target_is_admin: target.is_admin,
        editor_is_admin: editor.is_admin,
        notice,
        error,
        name: target.name.clone(),
        phone_number: target.phone_number.clone().unwrap_or_default(),
        timezones: SUPPORTED_TIMEZONES
            .iter()
            .map(|zone| TimezoneOption {
                name: zone.to_string(),
                selected: *zone == target.timezone,
            })
            .collect(),
        supportable,
    })
}

#[derive(Deserialize)]
pub struct EditParams {
    #[serde(default)]
    pub notice: String,
}

/// GET /hub/users/:id/edit — Edit form for a user. Self or admin only.
pub async fn show(
    AuthenticatedUser(editor): AuthenticatedUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<EditParams>,
) -> Result<impl IntoResponse, AppError> {
    let target = load_target(&state.db, &raw_id).await?;
    if !may_edit(&editor, &target) {
        return Err(AppError::Forbidden);
    }
    let ctx = AbilityContext::load(&state.db, &editor).await?;
    edit_template(&state, &ctx, &editor, &target, params.notice, String::new()).await
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub phone_number: String,

    #[serde(default)]
    pub timezone: String,

    /// Checkbox; present only when ticked. Admin-only, ignored otherwise.
    #[serde(default)]
    pub is_admin: Option<String>,

    /// Supported-organization grants. Admin-only, ignored otherwise.
    #[serde(default)]
    pub supported: Vec<String>,
}

/// POST /hub/users/:id/edit — Save profile changes.
///
/// Name, phone and timezone are editable by the user themselves. The admin
/// flag and supported-organization grants only take effect when the editor
/// is an admin; a non-admin submitting them is silently ignored.
pub async fn submit(
    AuthenticatedUser(editor): AuthenticatedUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(form): Form<EditForm>,
) -> Result<Response, AppError> {
    let target = load_target(&state.db, &raw_id).await?;
    if !may_edit(&editor, &target) {
        return Err(AppError::Forbidden);
    }
    let ctx = AbilityContext::load(&state.db, &editor).await?;

    let name = form.name.trim();
    if name.len() > 255 {
        let template =
            edit_template(&state, &ctx, &editor, &target, String::new(), "Name is too long".to_string())
                .await?;
        return Ok(template.into_response());
    }

    let Ok(timezone) = Timezone::new(form.timezone.clone()) else {
        let template = edit_template(
            &state,
            &ctx,
            &editor,
            &target,
            String::new(),
            "Please select a valid timezone.".to_string(),
        )
        .await?;
        return Ok(template.into_response());
    };

    let phone_number = match form.phone_number.trim() {
        "" => None,
        raw => match PhoneNumber::new(raw.to_string()) {
            Ok(phone) => Some(phone),
            Err(_) => {
                let template = edit_template(
                    &state,
                    &ctx,
                    &editor,
                    &target,
                    String::new(),
                    "Please enter a valid phone number.".to_string(),
                )
                .await?;
                return Ok(template.into_response());
            }
        },
    };

    let target_id = UserId::from_string(&target.id).map_err(|_| AppError::NotFound)?;
    db::users::update_profile(&state.db, &target_id, name, phone_number.as_ref(), &timezone).await?;

    if editor.is_admin {
        db::users::set_admin(&state.db, &target_id, form.is_admin.is_some()).await?;

        db::supported_organizations::clear_for_user(&state.db, &target_id).await?;
        for raw in &form.supported {
            let Ok(org_id) = OrganizationId::from_string(raw) else {
                continue;
            };
            if ctx.directory.contains(&org_id) {
                db::supported_organizations::add(&state.db, &target_id, &org_id).await?;
            }
        }
    }

    Ok(Redirect::to(&format!(
        "/hub/users/{}/edit?notice={}",
        target.id,
        urlencoding::encode("Profile saved"),
    ))
    .into_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hub/profile", get(profile))
        .route("/hub/users/:id/edit", get(show).post(submit))
}
