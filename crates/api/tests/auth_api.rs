//! HTTP-level tests for registration, login, refresh, logout and the
//! caller's own account endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, get_auth, post_json, post_json_auth, put_json_auth, TEST_PASSWORD,
};
use rallypoint_db::models::user::UpdateUser;
use rallypoint_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_tokens_and_defaults_to_user_role(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "username": "maya",
        "email": "Maya@Example.com",
        "password": "long-enough-pw",
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["username"], "maya");
    assert_eq!(json["user"]["email"], "maya@example.com");
    assert_eq!(json["user"]["role"], "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_as_enterprise(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "username": "blue-note",
        "email": "hello@bluenote.test",
        "password": "long-enough-pw",
        "role": "enterprise",
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["user"]["role"], "enterprise");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_cannot_self_register(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "username": "sneaky",
        "email": "sneaky@example.com",
        "password": "long-enough-pw",
        "role": "admin",
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_bad_input(pool: PgPool) {
    let cases = [
        json!({ "username": "ok_name", "email": "not-an-email", "password": "long-enough-pw" }),
        json!({ "username": "ok_name", "email": "a@b.test", "password": "short" }),
        json!({ "username": "no spaces", "email": "a@b.test", "password": "long-enough-pw" }),
    ];
    for body in cases {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/api/auth/register", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_is_409(pool: PgPool) {
    create_user(&pool, "taken", "user").await;
    let app = common::build_test_app(pool);
    let body = json!({
        "username": "taken",
        "email": "other@example.com",
        "password": "long-enough-pw",
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Login / refresh / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_success_records_last_login(pool: PgPool) {
    let (user, _) = create_user(&pool, "loginuser", "user").await;
    let app = common::build_test_app(pool.clone());

    let response = login(app, "loginuser", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user.id);

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_bad_credentials_is_401(pool: PgPool) {
    create_user(&pool, "wrongpw", "user").await;

    let app = common::build_test_app(pool.clone());
    let response = login(app, "wrongpw", "not-the-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = login(app, "ghost", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn banned_user_cannot_login(pool: PgPool) {
    let (user, _) = create_user(&pool, "troll", "user").await;
    let ban = UpdateUser {
        status: Some("banned".into()),
        ..Default::default()
    };
    UserRepo::update(&pool, user.id, &ban).await.unwrap();

    let app = common::build_test_app(pool);
    let response = login(app, "troll", TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    create_user(&pool, "refresher", "user").await;

    let app = common::build_test_app(pool.clone());
    let login_json = body_json(login(app, "refresher", TEST_PASSWORD).await).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"].as_str().unwrap(), refresh_token);

    // The old token was consumed.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    create_user(&pool, "leaver", "user").await;

    let app = common::build_test_app(pool.clone());
    let login_json = body_json(login(app, "leaver", TEST_PASSWORD).await).await;
    let access = login_json["access_token"].as_str().unwrap();
    let refresh = login_json["refresh_token"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/auth/logout", json!({}), access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response =
        post_json(app, "/api/auth/refresh", json!({ "refresh_token": refresh })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/users/me", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Own account
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_profile_without_password(pool: PgPool) {
    let (user, token) = create_user(&pool, "profiled", "user").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], user.id);
    assert_eq!(json["status"], "active");
    assert!(json.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_me_changes_username_and_rejects_taken_ones(pool: PgPool) {
    create_user(&pool, "occupied", "user").await;
    let (_, token) = create_user(&pool, "renamer", "user").await;

    let app = common::build_test_app(pool.clone());
    let response =
        put_json_auth(app, "/api/users/me", json!({ "username": "renamed" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "renamed");

    let app = common::build_test_app(pool);
    let response =
        put_json_auth(app, "/api/users/me", json!({ "username": "occupied" }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_password_requires_current_password(pool: PgPool) {
    let (_, token) = create_user(&pool, "rotator", "user").await;

    let app = common::build_test_app(pool.clone());
    let wrong = json!({ "current_password": "nope-nope", "new_password": "brand-new-pass" });
    let response = put_json_auth(app, "/api/users/me/password", wrong, &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool.clone());
    let right = json!({ "current_password": TEST_PASSWORD, "new_password": "brand-new-pass" });
    let response = put_json_auth(app, "/api/users/me/password", right, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = login(app, "rotator", "brand-new-pass").await;
    assert_eq!(response.status(), StatusCode::OK);
}
