//! HTTP-level tests for the admin surface.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get_auth, post_json, post_json_auth, put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_routes_reject_other_roles(pool: PgPool) {
    let (_, user) = create_user(&pool, "plain", "user").await;
    let (_, venue) = create_user(&pool, "venue", "enterprise").await;

    for token in [&user, &venue] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, "/api/admin/users", token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["code"], "FORBIDDEN");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_and_get_users_hide_password_hashes(pool: PgPool) {
    let (_, admin) = create_user(&pool, "admin", "admin").await;
    let (ana, _) = create_user(&pool, "ana", "user").await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/admin/users", &admin).await).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/admin/users/{}", ana.id);
    let json = body_json(get_auth(app, &uri, &admin).await).await;
    assert_eq!(json["username"], "ana");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/users/999999", &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn banning_revokes_sessions_and_blocks_login(pool: PgPool) {
    let (_, admin) = create_user(&pool, "admin", "admin").await;
    let (ana, _) = create_user(&pool, "ana", "user").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "username": "ana", "password": common::TEST_PASSWORD });
    let login = body_json(post_json(app, "/api/auth/login", body).await).await;
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/admin/users/{}", ana.id);
    let response = put_json_auth(app, &uri, json!({ "status": "banned" }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "banned");

    let app = common::build_test_app(pool.clone());
    let body = json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool.clone());
    let body = json!({ "username": "ana", "password": common::TEST_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Lifting the ban restores access.
    let app = common::build_test_app(pool.clone());
    put_json_auth(app, &uri, json!({ "status": "active" }), &admin).await;
    let app = common::build_test_app(pool);
    let body = json!({ "username": "ana", "password": common::TEST_PASSWORD });
    assert_eq!(
        post_json(app, "/api/auth/login", body).await.status(),
        StatusCode::OK
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn issued_tokens_follow_the_account(pool: PgPool) {
    let (_, admin) = create_user(&pool, "admin", "admin").await;
    let (ana, ana_token) = create_user(&pool, "ana", "user").await;
    let uri = format!("/api/admin/users/{}", ana.id);

    let app = common::build_test_app(pool.clone());
    put_json_auth(app, &uri, json!({ "status": "banned" }), &admin).await;
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/users/me", &ana_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    put_json_auth(app, &uri, json!({ "status": "active" }), &admin).await;
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/users/me", &ana_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The token still says "user"; the account now says "admin".
    let app = common::build_test_app(pool.clone());
    put_json_auth(app, &uri, json!({ "role": "admin" }), &admin).await;
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/admin/users", &ana_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &admin).await.status(), StatusCode::NO_CONTENT);
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/users/me", &ana_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_changes_are_validated(pool: PgPool) {
    let (admin_user, admin) = create_user(&pool, "admin", "admin").await;
    let (ana, _) = create_user(&pool, "ana", "user").await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/admin/users/{}", ana.id);
    let response = put_json_auth(app, &uri, json!({ "role": "enterprise" }), &admin).await;
    assert_eq!(body_json(response).await["role"], "enterprise");

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "role": "superuser" }), &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let uri = format!("/api/admin/users/{}", admin_user.id);
    let response = put_json_auth(app, &uri, json!({ "role": "user" }), &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_user_rules(pool: PgPool) {
    let (admin_user, admin) = create_user(&pool, "admin", "admin").await;
    let (ana, _) = create_user(&pool, "ana", "user").await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/admin/users/{}", admin_user.id);
    assert_eq!(delete_auth(app, &uri, &admin).await.status(), StatusCode::CONFLICT);

    let uri = format!("/api/admin/users/{}", ana.id);
    let app = common::build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &admin).await.status(), StatusCode::NO_CONTENT);
    let app = common::build_test_app(pool);
    assert_eq!(delete_auth(app, &uri, &admin).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_password_sets_a_new_login(pool: PgPool) {
    let (_, admin) = create_user(&pool, "admin", "admin").await;
    let (ana, _) = create_user(&pool, "ana", "user").await;
    let uri = format!("/api/admin/users/{}/reset-password", ana.id);

    let app = common::build_test_app(pool.clone());
    let body = json!({ "new_password": "short" });
    assert_eq!(
        post_json_auth(app, &uri, body, &admin).await.status(),
        StatusCode::BAD_REQUEST
    );

    let app = common::build_test_app(pool.clone());
    let body = json!({ "new_password": "a-much-better-secret" });
    assert_eq!(
        post_json_auth(app, &uri, body, &admin).await.status(),
        StatusCode::NO_CONTENT
    );

    let app = common::build_test_app(pool.clone());
    let body = json!({ "username": "ana", "password": common::TEST_PASSWORD });
    assert_eq!(
        post_json(app, "/api/auth/login", body).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let app = common::build_test_app(pool);
    let body = json!({ "username": "ana", "password": "a-much-better-secret" });
    assert_eq!(
        post_json(app, "/api/auth/login", body).await.status(),
        StatusCode::OK
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overview_counts_and_group_listing(pool: PgPool) {
    let (_, admin) = create_user(&pool, "admin", "admin").await;
    let (_, ana) = create_user(&pool, "ana", "user").await;

    for name in ["Crew", "Book club"] {
        let app = common::build_test_app(pool.clone());
        post_json_auth(app, "/api/groups", json!({ "name": name }), &ana).await;
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/admin/groups", &admin).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/admin/stats", &admin).await).await;
    let stats = &json["data"];
    assert_eq!(stats["users"], 2);
    assert_eq!(stats["banned_users"], 0);
    assert_eq!(stats["groups"], 2);
    assert_eq!(stats["bookings"], 0);
}
