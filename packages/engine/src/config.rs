use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Default number of most-recent draw-history rows excluded from a draw.
pub const DEFAULT_DRAW_EXCLUDE_LAST: i64 = 10;

/// Default draw-history retention enforced by the reaper, in days.
pub const DEFAULT_DRAW_HISTORY_TTL_DAYS: i64 = 30;

/// Bounded attempt count for share slug generation.
pub const DEFAULT_SHARE_SLUG_ATTEMPTS: u32 = 5;

/// Prep-time bucket used for a daily pick when the user has no profile.
pub const DEFAULT_DAILY_PICK_FALLBACK_BUCKET: i16 = 30;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub draw_exclude_last: i64,
    pub draw_history_ttl_days: i64,
    pub share_slug_attempts: u32,
    pub daily_pick_fallback_bucket: i16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            draw_exclude_last: env_or("DRAW_EXCLUDE_LAST", DEFAULT_DRAW_EXCLUDE_LAST)?,
            draw_history_ttl_days: env_or("DRAW_HISTORY_TTL_DAYS", DEFAULT_DRAW_HISTORY_TTL_DAYS)?,
            share_slug_attempts: env_or("SHARE_SLUG_ATTEMPTS", DEFAULT_SHARE_SLUG_ATTEMPTS)?,
            daily_pick_fallback_bucket: env_or(
                "DAILY_PICK_FALLBACK_BUCKET",
                DEFAULT_DAILY_PICK_FALLBACK_BUCKET,
            )?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}
