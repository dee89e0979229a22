#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use gameplan_api::auth::jwt::JwtConfig;
use gameplan_api::config::{CatalogConfig, ServerConfig};
use gameplan_api::router::build_app_router;
use gameplan_api::state::AppState;
use gameplan_catalog::{game_page_url, CatalogError, CatalogGame, GameCatalog, SearchHit};
use gameplan_core::types::DbId;

pub const TEST_PASSWORD: &str = "Execute@rder66";
pub const GALAXY_TRUCKER: i64 = 31481;
pub const CATAN: i64 = 13;
pub const CARCASSONNE: i64 = 822;
/// Listed without player counts or a play time.
pub const WAVELENGTH: i64 = 262543;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            token_expiry_days: 7,
        },
        catalog: CatalogConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        },
    }
}

// ---------------------------------------------------------------------------
// Catalog stubs
// ---------------------------------------------------------------------------

fn catalog_game(bgg_ref: i64, name: &str, year: &str, players: (i32, i32), play_time: i32) -> CatalogGame {
    CatalogGame {
        bgg_ref,
        name: name.to_string(),
        year_published: year.to_string(),
        min_players: players.0,
        max_players: players.1,
        play_time,
        description: format!("{name} description"),
        thumbnail: format!("https://cf.geekdo-images.com/{bgg_ref}/thumb.jpg"),
        image: format!("https://cf.geekdo-images.com/{bgg_ref}/original.jpg"),
        url: game_page_url(bgg_ref),
    }
}

/// In-memory catalog with a handful of known games.
pub struct StubCatalog {
    games: Vec<CatalogGame>,
}

impl Default for StubCatalog {
    fn default() -> Self {
        Self {
            games: vec![
                catalog_game(GALAXY_TRUCKER, "Galaxy Trucker", "2007", (2, 4), 60),
                catalog_game(CATAN, "CATAN", "1995", (3, 4), 120),
                catalog_game(CARCASSONNE, "Carcassonne", "2000", (2, 5), 45),
                catalog_game(WAVELENGTH, "Wavelength", "2019", (0, 0), 0),
            ],
        }
    }
}

#[async_trait]
impl GameCatalog for StubCatalog {
    async fn fetch_game(&self, bgg_ref: i64) -> Result<Option<CatalogGame>, CatalogError> {
        Ok(self.games.iter().find(|g| g.bgg_ref == bgg_ref).cloned())
    }

    async fn search_exact(&self, name: &str) -> Result<Option<CatalogGame>, CatalogError> {
        Ok(self
            .games
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CatalogError> {
        let query = query.to_lowercase();
        Ok(self
            .games
            .iter()
            .filter(|g| g.name.to_lowercase().contains(&query))
            .map(|g| SearchHit {
                id: g.bgg_ref,
                name: g.name.clone(),
                year_published: g.year_published.clone(),
            })
            .collect())
    }
}

/// Catalog that always fails as if BoardGameGeek were down.
pub struct UnavailableCatalog;

#[async_trait]
impl GameCatalog for UnavailableCatalog {
    async fn fetch_game(&self, _bgg_ref: i64) -> Result<Option<CatalogGame>, CatalogError> {
        Err(unavailable())
    }

    async fn search_exact(&self, _name: &str) -> Result<Option<CatalogGame>, CatalogError> {
        Err(unavailable())
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, CatalogError> {
        Err(unavailable())
    }
}

fn unavailable() -> CatalogError {
    CatalogError::ApiError {
        status: 503,
        body: "Service Unavailable".to_string(),
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware layers, using the
/// given database pool and the stub catalog.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_catalog(pool, Arc::new(StubCatalog::default()))
}

pub fn build_test_app_with_catalog(pool: PgPool, catalog: Arc<dyn GameCatalog>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        catalog,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router should respond")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Request with a raw `Authorization` header value.
pub async fn get_with_authorization(app: Router, uri: &str, value: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, value)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("router should respond")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A registered user and their bearer token.
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

pub fn register_body(username: &str) -> Value {
    json!({
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
        "username": username,
        "location": "Geelong",
        "securityQuestionOne": "Rex",
        "securityQuestionTwo": "Geelong",
        "securityQuestionThree": "Blue",
    })
}

/// Register through the API and return the new user's id and token.
pub async fn register_user(app: &Router, username: &str) -> TestUser {
    let response = post_json(app.clone(), "/user/register", register_body(username)).await;
    assert_eq!(response.status(), 201, "registration of {username} should succeed");
    let json = body_json(response).await;
    TestUser {
        id: json["user"]["id"].as_i64().expect("user id"),
        token: json["token"].as_str().expect("token").to_string(),
    }
}

/// Add a catalog game to the user's collection and return its local id.
pub async fn add_game(app: &Router, user: &TestUser, bgg_ref: i64) -> DbId {
    let response = post_json_auth(app.clone(), "/games/add", json!({ "id": bgg_ref }), &user.token).await;
    assert_eq!(response.status(), 200, "adding game {bgg_ref} should succeed");
    body_json(response).await["game"]["id"].as_i64().expect("game id")
}

/// The caller's profile as returned by `GET /user`.
pub async fn profile(app: &Router, user: &TestUser) -> Value {
    let response = get_auth(app.clone(), "/user", &user.token).await;
    assert_eq!(response.status(), 200);
    body_json(response).await["user"].clone()
}

/// Ids in a JSON array of numbers.
pub fn ids(value: &Value) -> Vec<DbId> {
    value
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|v| v.as_i64().expect("expected an id"))
        .collect()
}
