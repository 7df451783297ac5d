use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 4100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub log_level: String,
    /// Daily-rolling log files are written here when set.
    pub log_dir: Option<String>,
    /// `*` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            log_dir: None,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load environment variables
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => u16::from_str(raw.trim()).map_err(|e| anyhow!("Invalid PORT '{raw}': {e}"))?,
            None => defaults.port,
        };

        let config = Self {
            environment: lookup("RUST_ENV").unwrap_or(defaults.environment),
            port,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level).to_lowercase(),
            log_dir: lookup("LOG_DIR"),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|raw| Self::parse_origins(&raw))
                .unwrap_or(defaults.cors_origins),
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("PORT must be greater than 0".to_string());
        }
        if !matches!(self.log_level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            errors.push(format!("Unknown LOG_LEVEL '{}'", self.log_level));
        }
        if self.cors_origins.is_empty() {
            errors.push("CORS_ORIGINS must list at least one origin".to_string());
        }
        if self.is_production() && self.allows_any_origin() {
            errors.push("CORS_ORIGINS must not be '*' in production".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Configuration validation failed: {}", errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("RUST_ENV", "production"),
            ("LOG_LEVEL", "DEBUG"),
            ("LOG_DIR", "/var/log/paycrypt"),
            ("CORS_ORIGINS", "https://admin.paycrypt.org/, https://ops.paycrypt.org"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/paycrypt"));
        assert_eq!(
            config.cors_origins,
            vec!["https://admin.paycrypt.org", "https://ops.paycrypt.org"]
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LOG_LEVEL", "loud")])).is_err());
        assert!(Config::from_lookup(lookup(&[("RUST_ENV", "production")])).is_err());
    }
}
