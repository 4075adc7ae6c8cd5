//! The listing and the per-record check must agree: a client appears on
//! /hub/clients exactly when its detail page answers 200 for the same user.

mod common;

use common::*;
use http::StatusCode;
use sqlx::SqlitePool;
use taxhub::app::domain::{MembershipRole, OrganizationId};
use tower::ServiceExt;

struct Forest {
    orgs: Vec<(String, OrganizationId)>,
}

/// root -> {east, west}; east -> east_site; loner stands alone. One client
/// per organization, named after it.
async fn build_forest(pool: &SqlitePool) -> Forest {
    let root = create_org(pool, "Root", None).await;
    let east = create_org(pool, "East", Some(&root)).await;
    let west = create_org(pool, "West", Some(&root)).await;
    let east_site = create_org(pool, "East Site", Some(&east)).await;
    let loner = create_org(pool, "Loner", None).await;

    let orgs = vec![
        ("Root".to_string(), root),
        ("East".to_string(), east),
        ("West".to_string(), west),
        ("East Site".to_string(), east_site),
        ("Loner".to_string(), loner),
    ];

    // Names are chosen so no client name is a substring of another; the
    // consistency check greps the listing body for them.
    for (name, org) in &orgs {
        create_client(pool, Some(org), &format!("{name} Client File")).await;
    }

    Forest { orgs }
}

/// For every client in the forest: the client shows up in the listing iff
/// its detail page is permitted.
async fn assert_listing_matches_detail(pool: &SqlitePool, app: &axum::Router, cookie: &str) {
    let all_clients = sqlx::query_as::<_, taxhub::app::db::Client>("SELECT * FROM clients")
        .fetch_all(pool)
        .await
        .unwrap();

    let listing = app.clone().oneshot(get("/hub/clients", cookie)).await.unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
    let listing_body = body_string(listing).await;

    for client in &all_clients {
        let detail = app
            .clone()
            .oneshot(get(&format!("/hub/clients/{}", client.id), cookie))
            .await
            .unwrap();
        let listed = listing_body.contains(&client.legal_name);
        let permitted = detail.status() == StatusCode::OK;
        assert_eq!(
            listed, permitted,
            "listing and detail disagree for {} (listed: {listed}, detail: {})",
            client.legal_name,
            detail.status(),
        );
    }
}

fn org_id<'a>(forest: &'a Forest, name: &str) -> &'a OrganizationId {
    &forest.orgs.iter().find(|(n, _)| n == name).unwrap().1
}

#[tokio::test]
async fn member_of_mid_tree_org() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let forest = build_forest(&pool).await;

    let user = create_user(&pool, "vol@example.com", "Password123", false, None).await;
    add_membership(&pool, org_id(&forest, "East"), &user, MembershipRole::Member).await;
    let cookie = login(&app, "vol@example.com", "Password123").await;

    assert_listing_matches_detail(&pool, &app, &cookie).await;
}

#[tokio::test]
async fn lead_of_the_root() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let forest = build_forest(&pool).await;

    let user = create_user(&pool, "lead@example.com", "Password123", false, None).await;
    add_membership(&pool, org_id(&forest, "Root"), &user, MembershipRole::Lead).await;
    let cookie = login(&app, "lead@example.com", "Password123").await;

    assert_listing_matches_detail(&pool, &app, &cookie).await;
}

#[tokio::test]
async fn supporter_of_a_subtree() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let forest = build_forest(&pool).await;

    let user = create_user(&pool, "coalition@example.com", "Password123", false, None).await;
    add_supported(&pool, &user, org_id(&forest, "West")).await;
    let cookie = login(&app, "coalition@example.com", "Password123").await;

    assert_listing_matches_detail(&pool, &app, &cookie).await;
}

#[tokio::test]
async fn mixed_membership_and_support() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let forest = build_forest(&pool).await;

    let user = create_user(&pool, "mixed@example.com", "Password123", false, None).await;
    add_membership(&pool, org_id(&forest, "East Site"), &user, MembershipRole::Member).await;
    add_supported(&pool, &user, org_id(&forest, "Loner")).await;
    let cookie = login(&app, "mixed@example.com", "Password123").await;

    assert_listing_matches_detail(&pool, &app, &cookie).await;
}

#[tokio::test]
async fn user_with_no_grants() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    build_forest(&pool).await;

    create_user(&pool, "nobody@example.com", "Password123", false, None).await;
    let cookie = login(&app, "nobody@example.com", "Password123").await;

    assert_listing_matches_detail(&pool, &app, &cookie).await;
}

#[tokio::test]
async fn admin_covers_everything() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    build_forest(&pool).await;

    create_user(&pool, "admin@example.com", "Password123", true, None).await;
    let cookie = login(&app, "admin@example.com", "Password123").await;

    assert_listing_matches_detail(&pool, &app, &cookie).await;
}
