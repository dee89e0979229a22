//! HTTP-level integration tests for the `/user` endpoints.
//!
//! Tests cover registration, login, the bearer token checks, password
//! recovery, profile updates, account deletion and the collection.

mod common;

use axum::http::StatusCode;
use common::{
    add_game, body_json, delete_auth, get, get_auth, get_with_authorization, patch_json_auth,
    post_json, register_body, register_user, CATAN, GALAXY_TRUCKER, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

const POLICY_MESSAGE: &str = "Password must be between 8-16 characters and include an uppercase \
                              letter, lowercase letter, number, and special character.";

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration returns 201 with a token and a user without secrets.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/user/register", register_body("ada")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["status"], 201);
    assert_eq!(json["message"], "User registered successfully");
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["username"], "ada");
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["gamesOwned"], json!([]));
    assert_eq!(json["user"]["eventsAttending"], json!([]));
    assert!(json["user"].get("passwordHash").is_none());
    assert!(json["user"].get("securityAnswerOne").is_none());
}

/// A taken username or email is a 409.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "ada").await;

    let mut body = register_body("ada");
    body["email"] = json!("other@example.com");
    let response = post_json(app.clone(), "/user/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["message"], "This email address or username is already in use!");

    let mut body = register_body("grace");
    body["email"] = json!("ada@example.com");
    let response = post_json(app, "/user/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// A weak password is rejected with the policy message.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_weak_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut body = register_body("ada");
    body["password"] = json!("password");
    let response = post_json(app, "/user/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], POLICY_MESSAGE);
    assert_eq!(json["errors"], json!([POLICY_MESSAGE]));
}

/// Field validation reports each failure.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_invalid_fields(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut body = register_body("ada");
    body["email"] = json!("not-an-email");
    let response = post_json(app.clone(), "/user/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Please enter a valid email address");

    let mut body = register_body("ab");
    body["email"] = json!("nope");
    let response = post_json(app, "/user/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid request data");
    assert_eq!(json["errors"].as_array().unwrap().len(), 2);
}

/// Malformed JSON gets the same failure envelope.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_malformed_body(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/user/register", json!({ "email": "ada@example.com" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], 400);
    assert!(json["errors"].is_array());
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = register_user(&app, "ada").await;

    let body = json!({ "username": "ada", "password": TEST_PASSWORD });
    let response = post_json(app, "/user/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "ada has logged in!");
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_missing_details(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app.clone(), "/user/login", json!({ "username": "ada" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Missing login details");

    let body = json!({ "username": "  ", "password": TEST_PASSWORD });
    let response = post_json(app, "/user/login", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "username": "ghost", "password": TEST_PASSWORD });
    let response = post_json(app, "/user/login", body).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "User not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "ada").await;

    let body = json!({ "username": "ada", "password": "Wrong@pass1" });
    let response = post_json(app, "/user/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Incorrect password");
}

// ---------------------------------------------------------------------------
// Bearer token checks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/user").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Access Denied. No Authorization header provided"
    );

    let response = get_with_authorization(app.clone(), "/user", "Token abc").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Access Denied. No token provided");

    let response = get_with_authorization(app, "/user", "Bearer not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

/// Expired tokens get the same message as forged ones.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_token_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = register_user(&app, "ada").await;

    let config = common::test_config();
    let now = chrono::Utc::now().timestamp();
    let claims = gameplan_api::auth::jwt::Claims {
        sub: user.id,
        exp: now - 300,
        iat: now - 600,
        jti: "expired".to_string(),
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(config.jwt.secret.as_bytes()),
    )
    .unwrap();

    let response = get_auth(app, "/user", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_with_and_without_trailing_slash(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = register_user(&app, "ada").await;

    for uri in ["/user", "/user/"] {
        let response = get_auth(app.clone(), uri, &user.token).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["message"], "User retrieved successfully");
        assert_eq!(json["user"]["id"], user.id);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = register_user(&app, "ada").await;

    let body = json!({ "location": "Melbourne", "bio": "Likes engine builders" });
    let response = patch_json_auth(app.clone(), "/user/update", body, &user.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "User details have been updated!");
    assert_eq!(json["user"]["location"], "Melbourne");
    assert_eq!(json["user"]["bio"], "Likes engine builders");
    assert_eq!(json["user"]["username"], "ada");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_password_and_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ada = register_user(&app, "ada").await;
    register_user(&app, "grace").await;

    let response = patch_json_auth(
        app.clone(),
        "/user/update",
        json!({ "email": "grace@example.com" }),
        &ada.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = patch_json_auth(
        app.clone(),
        "/user/update",
        json!({ "password": "weak" }),
        &ada.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], POLICY_MESSAGE);

    let response = patch_json_auth(
        app.clone(),
        "/user/update",
        json!({ "password": "N3w-Passw0rd" }),
        &ada.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({ "username": "ada", "password": "N3w-Passw0rd" });
    let response = post_json(app, "/user/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_password_reset(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "ada").await;

    let body = json!({
        "email": "ada@example.com",
        "securityQuestionOne": " rex",
        "securityQuestionTwo": "GEELONG",
        "securityQuestionThree": "blue",
        "password": "Fresh#Start9",
    });
    let response = post_json(app.clone(), "/user/password-reset", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Password reset successfully");

    let body = json!({ "username": "ada", "password": "Fresh#Start9" });
    let response = post_json(app.clone(), "/user/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({ "username": "ada", "password": TEST_PASSWORD });
    let response = post_json(app, "/user/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_password_reset_wrong_answers(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "ada").await;

    let body = json!({
        "email": "ada@example.com",
        "securityQuestionOne": "Rex",
        "securityQuestionTwo": "Sydney",
        "securityQuestionThree": "Blue",
        "password": "Fresh#Start9",
    });
    let response = post_json(app.clone(), "/user/password-reset", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Incorrect security details provided"
    );

    let body = json!({
        "email": "nobody@example.com",
        "securityQuestionOne": "Rex",
        "securityQuestionTwo": "Geelong",
        "securityQuestionThree": "Blue",
        "password": "Fresh#Start9",
    });
    let response = post_json(app, "/user/password-reset", body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_account(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = register_user(&app, "ada").await;

    let response = delete_auth(app.clone(), "/user", &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "User deleted successfully");

    // The token outlives the account.
    let response = get_auth(app, "/user", &user.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "User not found");
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collection_search(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = register_user(&app, "ada").await;
    add_game(&app, &user, GALAXY_TRUCKER).await;
    add_game(&app, &user, CATAN).await;

    let response = get_auth(app.clone(), "/user/collection", &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Games retrieved successfully");
    let names: Vec<_> = json["games"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["CATAN", "Galaxy Trucker"]);

    let response = get_auth(app.clone(), "/user/collection?search=GALAXY", &user.token).await;
    let json = body_json(response).await;
    assert_eq!(json["games"].as_array().unwrap().len(), 1);
    assert_eq!(json["games"][0]["bggRef"], GALAXY_TRUCKER);

    let response = get_auth(app, "/user/collection?search=%20%20", &user.token).await;
    let json = body_json(response).await;
    assert_eq!(json["games"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_game_from_collection(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = register_user(&app, "ada").await;
    let game_id = add_game(&app, &user, GALAXY_TRUCKER).await;

    let uri = format!("/user/collection/{game_id}");
    let response = delete_auth(app.clone(), &uri, &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Game: Galaxy Trucker has been removed from ada's collection successfully"
    );

    let profile = common::profile(&app, &user).await;
    assert_eq!(profile["gamesOwned"], json!([]));

    let response = delete_auth(app.clone(), &uri, &user.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Game not in collection");

    let response = delete_auth(app.clone(), "/user/collection/999999", &user.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Game not found");

    let response = delete_auth(app, "/user/collection/abc", &user.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
