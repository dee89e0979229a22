//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?hosted=` on `GET /user/events`. Absent means attended events.
#[derive(Debug, Deserialize)]
pub struct HostedParams {
    #[serde(default)]
    pub hosted: bool,
}

/// `?search=` on `GET /user/collection`.
#[derive(Debug, Deserialize)]
pub struct CollectionParams {
    pub search: Option<String>,
}

/// `?query=&strict=` on `GET /games/search`.
#[derive(Debug, Deserialize)]
pub struct CatalogSearchParams {
    pub query: Option<String>,
    #[serde(default)]
    pub strict: bool,
}

/// Trimmed, non-empty value of an optional text parameter.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
