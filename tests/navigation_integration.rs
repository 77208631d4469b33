mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{
    body_json, build_app, get, load_test_config, location, post, post_json, settle, MEMORY_CONFIG,
};

#[tokio::test]
async fn integration_protected_path_redirects_to_login() {
    let (router, app) = build_app(load_test_config(MEMORY_CONFIG)).await;

    let response = router
        .clone()
        .oneshot(get("/app/thoughts"))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/app/login");
    let body = body_json(response).await;
    assert_eq!(body["outcome"], "redirected");
    assert_eq!(body["from"], "/thoughts");
    assert_eq!(body["view"]["view"], "login");
    assert_eq!(app.router.current().unwrap().route_name, "Login");
}

#[tokio::test]
async fn integration_home_is_protected() {
    let (router, _app) = build_app(load_test_config(MEMORY_CONFIG)).await;

    let response = router
        .oneshot(get("/app"))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/app/login");
}

#[tokio::test]
async fn integration_reader_receives_id_prop() {
    let (router, _app) = build_app(load_test_config(MEMORY_CONFIG)).await;

    let response = router
        .oneshot(get("/app/note/42"))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["outcome"], "allowed");
    assert_eq!(body["view"]["view"], "thought-reader");
    assert_eq!(body["view"]["props"], json!({"id": "42"}));
}

#[tokio::test]
async fn integration_login_then_protected_path_is_allowed() {
    let (router, app) = build_app(load_test_config(MEMORY_CONFIG)).await;

    let response = router
        .clone()
        .oneshot(post_json(
            "/auth/login",
            json!({"email": "writer@example.com", "password": "secret"}),
        ))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["id"], "user-1");

    let response = router
        .clone()
        .oneshot(get("/auth/me"))
        .await
        .expect("request should complete");
    let body = body_json(response).await;
    assert_eq!(body["email"], "writer@example.com");

    let response = router
        .clone()
        .oneshot(get("/app/thoughts"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["view"]["view"], "thought-list");
    assert_eq!(app.router.history().len(), 1);
}

#[tokio::test]
async fn integration_logout_clears_user_and_protects_again() {
    let (router, app) = build_app(load_test_config(MEMORY_CONFIG)).await;

    router
        .clone()
        .oneshot(post_json(
            "/auth/login",
            json!({"email": "writer@example.com", "password": "secret"}),
        ))
        .await
        .expect("request should complete");
    settle().await;
    assert!(app.user_store.is_authenticated());

    let response = router
        .clone()
        .oneshot(post("/auth/logout"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    settle().await;
    assert_eq!(app.user_store.email(), None);

    let response = router
        .clone()
        .oneshot(get("/auth/me"))
        .await
        .expect("request should complete");
    let body = body_json(response).await;
    assert_eq!(body["email"], serde_json::Value::Null);
    assert_eq!(body["user"], serde_json::Value::Null);

    let response = router
        .oneshot(get("/app/compose"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn integration_wrong_password_is_unauthorized() {
    let (router, app) = build_app(load_test_config(MEMORY_CONFIG)).await;

    let response = router
        .oneshot(post_json(
            "/auth/login",
            json!({"email": "writer@example.com", "password": "wrong"}),
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid login credentials");
    assert!(!app.user_store.is_authenticated());
}

#[tokio::test]
async fn integration_unknown_path_is_not_found() {
    let (router, _app) = build_app(load_test_config(MEMORY_CONFIG)).await;

    let response = router
        .oneshot(get("/app/does/not/exist"))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn integration_health_check() {
    let (router, _app) = build_app(load_test_config(MEMORY_CONFIG)).await;

    let response = router
        .oneshot(get("/health"))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
}
