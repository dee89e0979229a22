use gameplan_catalog::client::DEFAULT_BASE_URL;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Built once in `main` and shared through `AppState`; nothing below the
/// entrypoint reads the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string, selected by `APP_ENV`.
    pub database_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Game catalog client configuration.
    pub catalog: CatalogConfig,
}

/// Settings for the BoardGameGeek client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Production,
    Development,
    Test,
}

impl AppEnv {
    /// Parse `APP_ENV`; anything unrecognised is production.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("development") | Some("dev") => Self::Development,
            Some("test") => Self::Test,
            _ => Self::Production,
        }
    }
}

/// Pick the database URL for `env` from the given variable lookup.
///
/// | `APP_ENV`     | Variable            | Default                              |
/// |---------------|---------------------|--------------------------------------|
/// | `test`        | `DATABASE_URL_TEST` | `postgres://localhost/gameplan_test` |
/// | `development` | `DATABASE_URL_DEV`  | `postgres://localhost/gameplan_dev`  |
/// | other / unset | `DATABASE_URL`      | **required**                         |
pub fn database_url_for(
    env: AppEnv,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, String> {
    match env {
        AppEnv::Test => Ok(lookup("DATABASE_URL_TEST")
            .unwrap_or_else(|| "postgres://localhost/gameplan_test".into())),
        AppEnv::Development => Ok(lookup("DATABASE_URL_DEV")
            .unwrap_or_else(|| "postgres://localhost/gameplan_dev".into())),
        AppEnv::Production => {
            lookup("DATABASE_URL").ok_or_else(|| "DATABASE_URL must be set".to_string())
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `APP_ENV`              | `production`               |
    ///
    /// See [`database_url_for`], [`JwtConfig::from_env`] and
    /// [`CatalogConfig::from_env`] for the remaining variables.
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers or a missing required variable, so
    /// misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_env = AppEnv::parse(std::env::var("APP_ENV").ok().as_deref());
        let database_url = database_url_for(app_env, |key| std::env::var(key).ok())
            .unwrap_or_else(|e| panic!("{e}"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            jwt: JwtConfig::from_env(),
            catalog: CatalogConfig::from_env(),
        }
    }
}

impl CatalogConfig {
    /// | Env Var                | Default                           |
    /// |------------------------|-----------------------------------|
    /// | `CATALOG_BASE_URL`     | `https://boardgamegeek.com/xmlapi`|
    /// | `CATALOG_TIMEOUT_SECS` | `10`                              |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CATALOG_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let timeout_secs: u64 = std::env::var("CATALOG_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("CATALOG_TIMEOUT_SECS must be a valid u64");
        Self {
            base_url,
            timeout_secs,
        }
    }
}
