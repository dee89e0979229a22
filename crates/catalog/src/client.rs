//! HTTP client for the BoardGameGeek XML API v1.
//!
//! Wraps `GET /boardgame/{id}` and `GET /search` using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;

use crate::parse::{parse_game, parse_search, parse_search_refs};
use crate::{CatalogGame, GameCatalog, SearchHit};

/// Production base URL.
pub const DEFAULT_BASE_URL: &str = "https://boardgamegeek.com/xmlapi";

/// HTTP client for the catalog.
#[derive(Debug, Clone)]
pub struct BggClient {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the catalog layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog returned a non-2xx status code.
    #[error("Catalog API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the XML we expected.
    #[error("Malformed catalog response: {0}")]
    Parse(#[from] quick_xml::DeError),
}

impl BggClient {
    /// Create a client with its own connection pool and request timeout.
    ///
    /// * `base_url` - API root, e.g. [`DEFAULT_BASE_URL`]. A trailing slash
    ///   is ignored.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gameplan/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- private helpers ----

    /// GET `path` under the base URL and return the body text.
    async fn get_xml(&self, path: &str, query: &[(&str, &str)]) -> Result<String, CatalogError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, ?query, "Catalog request");

        let response = self.client.get(&url).query(query).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`CatalogError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl GameCatalog for BggClient {
    async fn fetch_game(&self, bgg_ref: i64) -> Result<Option<CatalogGame>, CatalogError> {
        let xml = self.get_xml(&format!("boardgame/{bgg_ref}"), &[]).await?;
        Ok(parse_game(&xml)?)
    }

    async fn search_exact(&self, name: &str) -> Result<Option<CatalogGame>, CatalogError> {
        let xml = self
            .get_xml("search", &[("search", name), ("exact", "1")])
            .await?;
        match parse_search_refs(&xml)?.first() {
            Some(&bgg_ref) => self.fetch_game(bgg_ref).await,
            None => Ok(None),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CatalogError> {
        let xml = self.get_xml("search", &[("search", query)]).await?;
        Ok(parse_search(&xml)?)
    }
}
