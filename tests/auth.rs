mod common;

mod login {
    use crate::common::*;
    use axum::body::Body;
    use http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn valid_credentials_set_session_and_redirect_to_hub() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());
        create_user(&pool, "vol@example.com", "Password123", false, None).await;

        let request = http::Request::builder()
            .method("POST")
            .uri("/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(login_form_body("vol@example.com", "Password123")))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/hub/clients");
        let set_cookie = response.headers().get("set-cookie").unwrap().to_str().unwrap();
        assert!(extract_session_id_from_cookie(set_cookie).is_some());
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn wrong_password_rerenders_form_without_cookie() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());
        create_user(&pool, "vol@example.com", "Password123", false, None).await;

        let request = http::Request::builder()
            .method("POST")
            .uri("/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(login_form_body("vol@example.com", "WrongPass1")))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("set-cookie").is_none());
        let body = body_string(response).await;
        assert!(body.contains("Invalid email or password"));
    }

    #[tokio::test]
    async fn unknown_email_gets_the_same_error_as_wrong_password() {
        let pool = test_pool().await;
        let app = test_router(pool);

        let request = http::Request::builder()
            .method("POST")
            .uri("/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(login_form_body("nobody@example.com", "Password123")))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Invalid email or password"));
    }
}

mod sessions {
    use crate::common::*;
    use axum::body::Body;
    use http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn anonymous_hub_request_redirects_to_login() {
        let pool = test_pool().await;
        let app = test_router(pool);

        let request = http::Request::builder()
            .method("GET")
            .uri("/hub/clients")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/login");
    }

    #[tokio::test]
    async fn bogus_session_cookie_redirects_to_login() {
        let pool = test_pool().await;
        let app = test_router(pool);

        let response = app
            .oneshot(get("/hub/clients", "session_id=not-a-real-session"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/login");
    }

    #[tokio::test]
    async fn logout_deletes_the_session() {
        let pool = test_pool().await;
        let app = test_router(pool.clone());
        create_user(&pool, "vol@example.com", "Password123", true, None).await;
        let cookie = login(&app, "vol@example.com", "Password123").await;

        let response = app
            .clone()
            .oneshot(post_form("/logout", &cookie, String::new()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        // The old cookie no longer works.
        let response = app.oneshot(get("/hub/clients", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/login");
    }
}
