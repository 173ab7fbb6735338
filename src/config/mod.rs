use std::env;
use std::time::Duration;

use regex::Regex;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub sightings_table: String,
    pub host: String,
    pub port: u16,
    pub refresh_interval_ms: u64,
    pub auto_refresh: bool,
    pub top_n: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Configuration("DATABASE_URL must be set".to_string()))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            sightings_table: env::var("SIGHTINGS_TABLE").unwrap_or_else(|_| "pokemon".to_string()),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "8050".to_string())
                .parse()
                .unwrap_or(8050),
            refresh_interval_ms: env::var("DASHBOARD_REFRESH_INTERVAL_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            auto_refresh: env::var("DASHBOARD_AUTO_REFRESH")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            top_n: env::var("DASHBOARD_TOP_N")
                .unwrap_or_else(|_| "25".to_string())
                .parse()
                .unwrap_or(25),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the dashboard misbehave at runtime.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_table_name(&self.sightings_table)?;
        if self.refresh_interval_ms == 0 {
            return Err(AppError::Configuration(
                "DASHBOARD_REFRESH_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(AppError::Configuration(
                "DASHBOARD_TOP_N must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// The table name is interpolated into SQL, so only plain (optionally
/// schema-qualified) identifiers are accepted.
pub fn validate_table_name(name: &str) -> Result<(), AppError> {
    let pattern = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .map_err(|e| AppError::Internal(format!("Invalid table name pattern: {e}")))?;
    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(AppError::Configuration(format!(
            "SIGHTINGS_TABLE is not a valid table name: {name:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/pokedash".to_string(),
            database_max_connections: 5,
            sightings_table: "pokemon".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8050,
            refresh_interval_ms: 5000,
            auto_refresh: true,
            top_n: 25,
        }
    }

    #[test]
    fn accepts_plain_and_schema_qualified_tables() {
        assert!(validate_table_name("pokemon").is_ok());
        assert!(validate_table_name("public.pokemon_sightings").is_ok());
        assert!(validate_table_name("_staging2").is_ok());
    }

    #[test]
    fn rejects_injection_attempts() {
        assert!(validate_table_name("pokemon; DROP TABLE pokemon").is_err());
        assert!(validate_table_name("1pokemon").is_err());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("a.b.c").is_err());
        assert!(validate_table_name("\"pokemon\"").is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = sample();
        config.refresh_interval_ms = 0;
        assert!(matches!(config.validate(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let mut config = sample();
        config.top_n = 0;
        assert!(matches!(config.validate(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn refresh_interval_converts_to_duration() {
        assert_eq!(sample().refresh_interval(), Duration::from_millis(5000));
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
        assert!(!parse_flag("0"));
    }
}
