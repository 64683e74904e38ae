//! Environment-sourced configuration

use sqlx::postgres::PgSslMode;
use std::env;

// Main config structure, built once at startup and passed by reference
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Postgres connection settings
    pub database: DatabaseConfig,

    // Slack delivery settings
    pub slack: SlackConfig,

    // force the synthetic data path even when the database is configured
    pub use_mock_data: bool,
}

// Postgres connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub sslmode: String,
}

// Slack upload settings, both must be present for uploads to happen
#[derive(Debug, Clone, Default)]
pub struct SlackConfig {
    pub token: Option<String>,
    pub channel: Option<String>,
}

impl AppConfig {
    /// Load configuration from the environment (reads a .env file if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database: DatabaseConfig {
                host: env_or("DB_HOST", "localhost"),
                port: env::var("DB_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(5432),
                dbname: env_or("DB_NAME", ""),
                user: env_or("DB_USER", ""),
                password: env_or("DB_PASSWORD", ""),
                sslmode: env_or("DB_SSLMODE", "require"),
            },
            slack: SlackConfig {
                token: env::var("SLACK_TOKEN").ok().filter(|v| !v.is_empty()),
                channel: env::var("SLACK_CHANNEL").ok().filter(|v| !v.is_empty()),
            },
            use_mock_data: env::var("USE_MOCK_DATA")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
        }
    }
}

impl DatabaseConfig {
    // map the libpq-style sslmode string onto the sqlx enum
    // unknown values fall back to require, the default
    pub fn ssl_mode(&self) -> PgSslMode {
        match self.sslmode.as_str() {
            "disable" => PgSslMode::Disable,
            "allow" => PgSslMode::Allow,
            "prefer" => PgSslMode::Prefer,
            "verify-ca" => PgSslMode::VerifyCa,
            "verify-full" => PgSslMode::VerifyFull,
            _ => PgSslMode::Require,
        }
    }
}

impl SlackConfig {
    // uploads happen only when both token and channel are set
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.channel.is_some()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slack_configured_requires_both() {
        let neither = SlackConfig::default();
        assert!(!neither.is_configured());

        let token_only = SlackConfig {
            token: Some("xoxb-test".to_string()),
            channel: None,
        };
        assert!(!token_only.is_configured());

        let both = SlackConfig {
            token: Some("xoxb-test".to_string()),
            channel: Some("C12345".to_string()),
        };
        assert!(both.is_configured());
    }

    #[test]
    fn test_ssl_mode_mapping() {
        let mut config = DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "ads".to_string(),
            user: "ads".to_string(),
            password: "secret".to_string(),
            sslmode: "disable".to_string(),
        };
        assert!(matches!(config.ssl_mode(), PgSslMode::Disable));

        config.sslmode = "verify-full".to_string();
        assert!(matches!(config.ssl_mode(), PgSslMode::VerifyFull));

        // unknown values fall back to require
        config.sslmode = "bogus".to_string();
        assert!(matches!(config.ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("YES"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }
}
