//! Reset the database and load demo data.
//!
//! Clears every table, caches a fixed list of BoardGameGeek games, creates a
//! demo account owning all of them, and hosts one published public event.
//! Uses the same environment configuration as the server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gameplan_api::config::ServerConfig;
use gameplan_api::services::accounts::{self, RegisterRequest};
use gameplan_api::services::events::{self, CreateEventRequest};
use gameplan_api::services::games::{self, AddGameRequest, GameRef};
use gameplan_api::state::AppState;
use gameplan_catalog::BggClient;

const SEED_REFS: &[i64] = &[
    234931, 149296, 15045, 151347, 150376, 164153, 124742, 175324, 185104, 18901, 233078, 141430,
    163745, 1931, 2452, 1917, 320, 4864, 1294, 15046, 71921, 312267, 296912, 192291, 128882, 54043,
    343629, 50381, 62871, 140934, 2223, 179172, 244500, 341772, 110327, 338521, 280986, 1927,
    181304, 237182, 161970, 39856, 160069, 124172,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gameplan_api=info,gameplan_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let pool = gameplan_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    gameplan_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let catalog = BggClient::new(
        config.catalog.base_url.clone(),
        Duration::from_secs(config.catalog.timeout_secs),
    )
    .context("Failed to build game catalog client")?;

    let state = AppState {
        pool,
        config: Arc::new(config),
        catalog: Arc::new(catalog),
    };

    sqlx::query("TRUNCATE event_participants, events, user_games, games, users RESTART IDENTITY")
        .execute(&state.pool)
        .await
        .context("Failed to clear tables")?;
    tracing::info!("Cleared all tables");

    let (_, user) = accounts::register(
        &state,
        RegisterRequest {
            email: "dilloncotter@gmail.com".into(),
            password: "Execute@rder66".into(),
            username: "Dilbot-Cot".into(),
            location: Some("Geelong, VIC, AUS".into()),
            bio: Some("Demo account".into()),
            security_question_one: "rex".into(),
            security_question_two: "geelong".into(),
            security_question_three: "blue".into(),
        },
    )
    .await
    .context("Failed to create demo user")?;
    tracing::info!(user_id = user.id, username = %user.username, "Created demo user");

    let mut first_game = None;
    let mut seeded = 0;
    for &bgg_ref in SEED_REFS {
        let request = AddGameRequest {
            id: Some(GameRef::Number(bgg_ref)),
        };
        match games::add_to_collection(&state, user.id, request).await {
            Ok(game) => {
                tracing::info!(bgg_ref, name = %game.name, "Seeded game");
                first_game.get_or_insert(game.id);
                seeded += 1;
            }
            Err(e) => tracing::warn!(bgg_ref, error = %e, "Skipped game"),
        }
    }
    let game = first_game.context("No games could be fetched from the catalog")?;

    let event = events::create(
        &state,
        user.id,
        CreateEventRequest {
            title: Some("Board Game Night".into()),
            event_date: Some(Utc::now() + chrono::Duration::days(7)),
            game,
            location: Some("Geelong Library".into()),
            min_participants: None,
            max_participants: Some(4),
            game_length: Some(90),
            is_public: Some(true),
            is_published: true,
        },
    )
    .await
    .context("Failed to create demo event")?;
    tracing::info!(event_id = event.id, "Created demo event");

    tracing::info!(games = seeded, "Seeding complete");
    Ok(())
}
