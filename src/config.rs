//! Application configuration management.
//!
//! Configuration is read from environment variables with `envy`, after an
//! optional `.env` file has been loaded.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `SESSION_TTL_HOURS` (optional): lifetime of login sessions, defaults to 72
/// - `DEFAULT_CURRENCY` (optional): currency given to new profiles, defaults to INR
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

fn default_session_ttl_hours() -> i64 {
    72
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a value cannot be
    /// parsed into its field type.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Missing .env is fine
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }

    /// Build a configuration from an iterator of `(KEY, value)` pairs.
    pub fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            Config::from_iter(vars(&[("DATABASE_URL", "postgres://localhost/ledger")])).unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.session_ttl_hours, 72);
        assert_eq!(config.default_currency, "INR");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_iter(vars(&[
            ("DATABASE_URL", "postgres://localhost/ledger"),
            ("SERVER_PORT", "8080"),
            ("SESSION_TTL_HOURS", "1"),
            ("DEFAULT_CURRENCY", "USD"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.session_ttl_hours, 1);
        assert_eq!(config.default_currency, "USD");
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(Config::from_iter(vars(&[("SERVER_PORT", "8080")])).is_err());
    }
}
