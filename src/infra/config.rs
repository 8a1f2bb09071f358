//! Centralized configuration (environment variables + defaults).

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub seed_sample_data: bool,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Database URL must be provided (no default) for safety.
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("APP_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid u32")?
            .max(1);

        let seed_sample_data = match lookup("SEED_SAMPLE_DATA") {
            None => true,
            Some(v) => v
                .trim()
                .parse::<bool>()
                .context("SEED_SAMPLE_DATA must be true or false")?,
        };

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            seed_sample_data,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |k| vars.get(k).map(|v| v.to_string())
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let vars = HashMap::from([("DATABASE_URL", "sqlite::memory:")]);
        let cfg = AppConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(cfg.address(), "0.0.0.0:3000");
        assert_eq!(cfg.db_max_connections, 5);
        assert!(cfg.seed_sample_data);
    }

    #[test]
    fn database_url_is_required() {
        let vars = HashMap::new();
        assert!(AppConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let vars = HashMap::from([("DATABASE_URL", "sqlite::memory:"), ("APP_PORT", "http")]);
        assert!(AppConfig::from_lookup(lookup(&vars)).is_err());

        let vars = HashMap::from([
            ("DATABASE_URL", "sqlite::memory:"),
            ("SEED_SAMPLE_DATA", "false"),
        ]);
        assert!(!AppConfig::from_lookup(lookup(&vars)).unwrap().seed_sample_data);
    }
}
