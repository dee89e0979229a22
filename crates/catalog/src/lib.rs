//! BoardGameGeek catalog gateway.
//!
//! Provides the [`GameCatalog`] trait the API depends on, the XML API v1
//! client that implements it, and the response parsers.

pub mod client;
pub mod parse;

use async_trait::async_trait;
use serde::Serialize;

pub use client::{BggClient, CatalogError};

/// Public page for a catalog entry.
pub fn game_page_url(bgg_ref: i64) -> String {
    format!("https://boardgamegeek.com/boardgame/{bgg_ref}")
}

/// Full catalog record for a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogGame {
    pub bgg_ref: i64,
    pub name: String,
    pub year_published: String,
    pub min_players: i32,
    pub max_players: i32,
    pub play_time: i32,
    pub description: String,
    pub thumbnail: String,
    pub image: String,
    pub url: String,
}

/// Partial record returned by a non-strict search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub year_published: String,
}

/// Remote game catalog.
///
/// `Ok(None)` / an empty list mean the catalog answered and had nothing;
/// `Err` means it could not be reached or answered garbage.
#[async_trait]
pub trait GameCatalog: Send + Sync {
    /// Fetch one game by catalog reference.
    async fn fetch_game(&self, bgg_ref: i64) -> Result<Option<CatalogGame>, CatalogError>;

    /// Exact-name lookup returning at most one full record.
    async fn search_exact(&self, name: &str) -> Result<Option<CatalogGame>, CatalogError>;

    /// Substring search returning partial records.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CatalogError>;
}
