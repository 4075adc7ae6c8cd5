mod common;

mod profile {
    use crate::common::*;
    use http::StatusCode;
    use taxhub::app::domain::MembershipRole;
    use tower::ServiceExt;

    #[tokio::test]
    async fn shows_memberships_and_supported_organizations() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let home = create_org(&pool, "Home Org", None).await;
        let supported = create_org(&pool, "Supported Org", None).await;
        let user = create_user(&pool, "vol@example.com", "Password123", false, Some(&home)).await;
        add_membership(&pool, &home, &user, MembershipRole::Lead).await;
        add_supported(&pool, &user, &supported).await;
        let cookie = login(&app, "vol@example.com", "Password123").await;

        let response = app.oneshot(get("/hub/profile", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Home Org"));
        assert!(body.contains("Organization lead"));
        assert!(body.contains("Supported Org"));
    }
}

mod edit {
    use crate::common::*;
    use http::StatusCode;
    use taxhub::app::db;
    use taxhub::app::domain::UserId;
    use tower::ServiceExt;

    async fn fetch_user(pool: &sqlx::SqlitePool, id: &UserId) -> db::User {
        db::users::find_by_id(pool, id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn user_edits_their_own_profile() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let user = create_user(&pool, "vol@example.com", "Password123", false, None).await;
        let cookie = login(&app, "vol@example.com", "Password123").await;

        let body = format!(
            "name={}&phone_number={}&timezone={}",
            urlencoding::encode("Mia Member"),
            urlencoding::encode("(832) 465-8840"),
            urlencoding::encode("America/Chicago"),
        );
        let response = app
            .oneshot(post_form(&format!("/hub/users/{user}/edit"), &cookie, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let updated = fetch_user(&pool, &user).await;
        assert_eq!(updated.name, "Mia Member");
        assert_eq!(updated.phone_number.as_deref(), Some("+18324658840"));
        assert_eq!(updated.timezone, "America/Chicago");
    }

    #[tokio::test]
    async fn editing_another_user_is_forbidden_for_non_admins() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let other = create_user(&pool, "other@example.com", "Password123", false, None).await;
        create_user(&pool, "vol@example.com", "Password123", false, None).await;
        let cookie = login(&app, "vol@example.com", "Password123").await;

        let response = app
            .clone()
            .oneshot(get(&format!("/hub/users/{other}/edit"), &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(post_form(
                &format!("/hub/users/{other}/edit"),
                &cookie,
                "name=Hacked&timezone=America/New_York".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_ne!(fetch_user(&pool, &other).await.name, "Hacked");
    }

    #[tokio::test]
    async fn admin_grants_admin_and_supported_organizations() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let org_a = create_org(&pool, "Org A", None).await;
        let org_b = create_org(&pool, "Org B", None).await;
        let target = create_user(&pool, "target@example.com", "Password123", false, None).await;
        create_user(&pool, "admin@example.com", "Password123", true, None).await;
        let cookie = login(&app, "admin@example.com", "Password123").await;

        let body = format!(
            "name=Target&timezone=America/New_York&is_admin=on&supported={}&supported={}",
            urlencoding::encode(&org_a.as_str()),
            urlencoding::encode(&org_b.as_str()),
        );
        let response = app
            .oneshot(post_form(&format!("/hub/users/{target}/edit"), &cookie, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        assert!(fetch_user(&pool, &target).await.is_admin);
        let mut supported = db::supported_organizations::list_for_user(&pool, &target)
            .await
            .unwrap();
        supported.sort();
        let mut expected = vec![org_a.as_str(), org_b.as_str()];
        expected.sort();
        assert_eq!(supported, expected);
    }

    #[tokio::test]
    async fn non_admin_submitting_admin_fields_is_ignored() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let org = create_org(&pool, "Org", None).await;
        let user = create_user(&pool, "vol@example.com", "Password123", false, None).await;
        let cookie = login(&app, "vol@example.com", "Password123").await;

        let body = format!(
            "name=Mia&timezone=America/New_York&is_admin=on&supported={}",
            urlencoding::encode(&org.as_str()),
        );
        let response = app
            .oneshot(post_form(&format!("/hub/users/{user}/edit"), &cookie, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let updated = fetch_user(&pool, &user).await;
        assert_eq!(updated.name, "Mia");
        assert!(!updated.is_admin);
        assert!(db::supported_organizations::list_for_user(&pool, &user)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn admin_revokes_grants_by_unchecking_them() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let org = create_org(&pool, "Org", None).await;
        let target = create_user(&pool, "target@example.com", "Password123", true, None).await;
        add_supported(&pool, &target, &org).await;
        create_user(&pool, "admin@example.com", "Password123", true, None).await;
        let cookie = login(&app, "admin@example.com", "Password123").await;

        // No is_admin and no supported boxes checked.
        let response = app
            .oneshot(post_form(
                &format!("/hub/users/{target}/edit"),
                &cookie,
                "name=Target&timezone=America/New_York".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        assert!(!fetch_user(&pool, &target).await.is_admin);
        assert!(db::supported_organizations::list_for_user(&pool, &target)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn invalid_phone_number_rerenders_with_an_error() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());

        let user = create_user(&pool, "vol@example.com", "Password123", false, None).await;
        let cookie = login(&app, "vol@example.com", "Password123").await;

        let response = app
            .oneshot(post_form(
                &format!("/hub/users/{user}/edit"),
                &cookie,
                "name=Mia&phone_number=12345&timezone=America/New_York".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("valid phone number"));
        assert!(fetch_user(&pool, &user).await.phone_number.is_none());
    }
}
