use crate::pipeline::{MAX_RADIUS, MIN_RADIUS};
use crate::scrapers::finn::DEFAULT_ORIGIN;
use crate::scrapers::http::DEFAULT_USER_AGENT;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub finn_origin: String,
    pub max_listings: usize,
    pub page_delay: Duration,
    pub request_timeout: Duration,
    pub default_radius: u32,
    pub query_timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            finn_origin: DEFAULT_ORIGIN.to_string(),
            max_listings: 200,
            page_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(30),
            default_radius: 500,
            query_timeout: Duration::from_secs(300),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();
        let config = Self {
            port: parse_var("PORT", defaults.port)?,
            finn_origin: env::var("FINN_ORIGIN").unwrap_or(defaults.finn_origin),
            max_listings: parse_var("MAX_LISTINGS", defaults.max_listings)?,
            page_delay: Duration::from_millis(parse_var("PAGE_DELAY_MS", 1000)?),
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30)?),
            default_radius: parse_var("DEFAULT_RADIUS", defaults.default_radius)?,
            query_timeout: Duration::from_secs(parse_var("QUERY_TIMEOUT_SECS", 300)?),
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
        };

        if !(MIN_RADIUS..=MAX_RADIUS).contains(&config.default_radius) {
            anyhow::bail!(
                "DEFAULT_RADIUS must be between {MIN_RADIUS} and {MAX_RADIUS}, got {}",
                config.default_radius
            );
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid number")),
        Err(_) => Ok(default),
    }
}
