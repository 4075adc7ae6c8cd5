mod common;

mod listing {
    use crate::common::*;
    use http::StatusCode;
    use taxhub::app::domain::MembershipRole;
    use tower::ServiceExt;

    #[tokio::test]
    async fn member_sees_their_subtree_only() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let mine = create_org(&pool, "Mine Org", None).await;
        create_org(&pool, "Mine Child", Some(&mine)).await;
        create_org(&pool, "Foreign Org", None).await;

        let user = create_user(&pool, "vol@example.com", "Password123", false, None).await;
        add_membership(&pool, &mine, &user, MembershipRole::Member).await;
        let cookie = login(&app, "vol@example.com", "Password123").await;

        let response = app.oneshot(get("/hub/organizations", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Mine Org"));
        assert!(body.contains("Mine Child"));
        assert!(!body.contains("Foreign Org"));
        // The creation form is admin-only.
        assert!(!body.contains("New organization"));
    }

    #[tokio::test]
    async fn admin_sees_everything_and_the_creation_form() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        create_org(&pool, "Org One", None).await;
        create_org(&pool, "Org Two", None).await;
        create_user(&pool, "admin@example.com", "Password123", true, None).await;
        let cookie = login(&app, "admin@example.com", "Password123").await;

        let response = app.oneshot(get("/hub/organizations", &cookie)).await.unwrap();
        let body = body_string(response).await;
        assert!(body.contains("Org One"));
        assert!(body.contains("Org Two"));
        assert!(body.contains("New organization"));
    }
}

mod creation {
    use crate::common::*;
    use http::StatusCode;
    use taxhub::app::db;
    use taxhub::app::domain::MembershipRole;
    use tower::ServiceExt;

    #[tokio::test]
    async fn admin_creates_an_organization_under_a_parent() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let parent = create_org(&pool, "Parent Org", None).await;
        create_user(&pool, "admin@example.com", "Password123", true, None).await;
        let cookie = login(&app, "admin@example.com", "Password123").await;

        let body = format!(
            "name={}&parent_id={}",
            urlencoding::encode("New Site"),
            urlencoding::encode(&parent.as_str()),
        );
        let response = app
            .oneshot(post_form("/hub/organizations", &cookie, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let all = db::organizations::list_all(&pool).await.unwrap();
        let created = all.iter().find(|o| o.name == "New Site").unwrap();
        assert_eq!(created.parent_id, Some(parent.as_str()));
    }

    #[tokio::test]
    async fn lead_cannot_create_organizations() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let org = create_org(&pool, "Org", None).await;
        let lead = create_user(&pool, "lead@example.com", "Password123", false, None).await;
        add_membership(&pool, &org, &lead, MembershipRole::Lead).await;
        let cookie = login(&app, "lead@example.com", "Password123").await;

        let response = app
            .oneshot(post_form(
                "/hub/organizations",
                &cookie,
                "name=Rogue+Org&parent_id=".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(db::organizations::list_all(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn supporter_cannot_create_organizations_either() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let org = create_org(&pool, "Org", None).await;
        let supporter = create_user(&pool, "coalition@example.com", "Password123", false, None).await;
        add_supported(&pool, &supporter, &org).await;
        let cookie = login(&app, "coalition@example.com", "Password123").await;

        let response = app
            .oneshot(post_form(
                "/hub/organizations",
                &cookie,
                "name=Rogue+Org&parent_id=".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_parent_is_rejected() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        create_user(&pool, "admin@example.com", "Password123", true, None).await;
        let cookie = login(&app, "admin@example.com", "Password123").await;

        let ghost = taxhub::app::domain::OrganizationId::new();
        let body = format!(
            "name=Orphan&parent_id={}",
            urlencoding::encode(&ghost.as_str()),
        );
        let response = app
            .oneshot(post_form("/hub/organizations", &cookie, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(db::organizations::list_all(&pool).await.unwrap().is_empty());
    }
}
