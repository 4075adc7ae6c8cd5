#![allow(dead_code)]

use axum::body::Body;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use taxhub::app::db;
use taxhub::app::domain::{
    ClientId, Email, HashedPassword, MembershipRole, OrganizationId, Password, PhoneNumber, UserId,
};
use taxhub::create_router;
use tower::ServiceExt;

pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn test_router(pool: SqlitePool) -> axum::Router {
    create_router(pool)
}

pub fn login_form_body(email: &str, password: &str) -> String {
    format!(
        "email={}&password={}",
        urlencoding::encode(email),
        urlencoding::encode(password)
    )
}

pub fn extract_session_id_from_cookie(set_cookie_header: &str) -> Option<&str> {
    set_cookie_header.split(';').next()?.strip_prefix("session_id=")
}

/// Create an organization, optionally under a parent.
pub async fn create_org(
    pool: &SqlitePool,
    name: &str,
    parent: Option<&OrganizationId>,
) -> OrganizationId {
    let id = OrganizationId::new();
    db::organizations::insert(
        pool,
        &db::NewOrganization {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent.cloned(),
        },
    )
    .await
    .unwrap();
    id
}

/// Create a user directly in the database. Password must meet strength rules.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    is_admin: bool,
    organization_id: Option<&OrganizationId>,
) -> UserId {
    let password = Password::new(password.to_string()).unwrap();
    let password_hash = HashedPassword::from_password(&password).unwrap();
    let user_id = UserId::new();
    db::users::insert(
        pool,
        &db::NewUser {
            id: user_id.clone(),
            email: Email::new(email.to_string()).unwrap(),
            password_hash,
            name: String::new(),
            is_admin,
            organization_id: organization_id.cloned(),
        },
    )
    .await
    .unwrap();
    user_id
}

pub async fn add_membership(
    pool: &SqlitePool,
    organization_id: &OrganizationId,
    user_id: &UserId,
    role: MembershipRole,
) {
    db::memberships::add(pool, organization_id, user_id, role)
        .await
        .unwrap();
}

pub async fn add_supported(pool: &SqlitePool, user_id: &UserId, organization_id: &OrganizationId) {
    db::supported_organizations::add(pool, user_id, organization_id)
        .await
        .unwrap();
}

/// Create a client, optionally assigned to an organization.
pub async fn create_client(
    pool: &SqlitePool,
    organization_id: Option<&OrganizationId>,
    legal_name: &str,
) -> ClientId {
    let id = ClientId::new();
    db::clients::insert(
        pool,
        &db::NewClient {
            id: id.clone(),
            organization_id: organization_id.cloned(),
            legal_name: legal_name.to_string(),
            preferred_name: String::new(),
            email: None,
            phone_number: None,
        },
    )
    .await
    .unwrap();
    id
}

/// Create a client that has a phone number on file (messages go out as SMS).
pub async fn create_client_with_phone(
    pool: &SqlitePool,
    organization_id: &OrganizationId,
    legal_name: &str,
    phone: &str,
) -> ClientId {
    let id = ClientId::new();
    db::clients::insert(
        pool,
        &db::NewClient {
            id: id.clone(),
            organization_id: Some(organization_id.clone()),
            legal_name: legal_name.to_string(),
            preferred_name: String::new(),
            email: None,
            phone_number: Some(PhoneNumber::new(phone.to_string()).unwrap()),
        },
    )
    .await
    .unwrap();
    id
}

/// Log a user in through the login form; returns the session cookie value
/// to send back as a `cookie` header.
pub async fn login(app: &axum::Router, email: &str, password: &str) -> String {
    let request = http::Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(login_form_body(email, password)))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::SEE_OTHER, "login should succeed");

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    let session_id = extract_session_id_from_cookie(set_cookie).unwrap();
    format!("session_id={session_id}")
}

pub fn get(uri: &str, cookie: &str) -> http::Request<Body> {
    http::Request::builder()
        .method("GET")
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, cookie: &str, body: String) -> http::Request<Body> {
    http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("cookie", cookie)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
