//! XML API v1 response parsing.
//!
//! Both `/boardgame/{id}` and `/search` answer with a `<boardgames>` root
//! holding zero or more `<boardgame objectid="...">` elements; an unknown
//! id yields a single `<boardgame>` wrapping an `<error>` element.

use serde::Deserialize;

use crate::{game_page_url, CatalogGame, SearchHit};

#[derive(Debug, Deserialize)]
struct BoardGames {
    #[serde(rename = "boardgame", default)]
    games: Vec<RawBoardGame>,
}

#[derive(Debug, Deserialize)]
struct RawBoardGame {
    #[serde(rename = "@objectid")]
    object_id: Option<String>,
    #[serde(default)]
    error: Option<RawError>,
    #[serde(rename = "name", default)]
    names: Vec<RawName>,
    yearpublished: Option<String>,
    minplayers: Option<String>,
    maxplayers: Option<String>,
    playingtime: Option<String>,
    description: Option<String>,
    thumbnail: Option<String>,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    #[serde(rename = "@primary")]
    primary: Option<String>,
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawError {
    #[serde(rename = "@message")]
    message: Option<String>,
}

impl RawBoardGame {
    fn bgg_ref(&self) -> Option<i64> {
        self.object_id.as_deref()?.trim().parse().ok()
    }

    /// The name flagged `primary="true"`, else the first non-empty one.
    fn primary_name(&self) -> Option<String> {
        let non_empty = |n: &&RawName| !n.value.trim().is_empty();
        self.names
            .iter()
            .filter(non_empty)
            .find(|n| n.primary.as_deref() == Some("true"))
            .or_else(|| self.names.iter().find(non_empty))
            .map(|n| n.value.trim().to_string())
    }

    fn year(&self) -> Option<String> {
        text(&self.yearpublished)
    }
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(value: &Option<String>) -> i32 {
    value
        .as_deref()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Parse a `/boardgame/{id}` response. `None` when the catalog reports an
/// error or returns no usable record.
pub fn parse_game(xml: &str) -> Result<Option<CatalogGame>, quick_xml::DeError> {
    let root: BoardGames = quick_xml::de::from_str(xml)?;
    let Some(raw) = root.games.into_iter().next() else {
        return Ok(None);
    };
    if let Some(error) = &raw.error {
        tracing::debug!(message = ?error.message, "Catalog reported an error");
        return Ok(None);
    }
    let (Some(bgg_ref), Some(name)) = (raw.bgg_ref(), raw.primary_name()) else {
        return Ok(None);
    };

    Ok(Some(CatalogGame {
        bgg_ref,
        name,
        year_published: raw.year().unwrap_or_default(),
        min_players: number(&raw.minplayers),
        max_players: number(&raw.maxplayers),
        play_time: number(&raw.playingtime),
        description: text(&raw.description).unwrap_or_default(),
        thumbnail: text(&raw.thumbnail).unwrap_or_default(),
        image: text(&raw.image).unwrap_or_default(),
        url: game_page_url(bgg_ref),
    }))
}

/// Parse a `/search` response into partial hits. Entries lacking a name or
/// a publication year are dropped.
pub fn parse_search(xml: &str) -> Result<Vec<SearchHit>, quick_xml::DeError> {
    let root: BoardGames = quick_xml::de::from_str(xml)?;
    Ok(root
        .games
        .iter()
        .filter_map(|raw| {
            Some(SearchHit {
                id: raw.bgg_ref()?,
                name: raw.primary_name()?,
                year_published: raw.year()?,
            })
        })
        .collect())
}

/// Catalog references from a `/search` response, in response order.
pub fn parse_search_refs(xml: &str) -> Result<Vec<i64>, quick_xml::DeError> {
    let root: BoardGames = quick_xml::de::from_str(xml)?;
    Ok(root.games.iter().filter_map(RawBoardGame::bgg_ref).collect())
}
