use crate::error::{Result, VisionaryError};
use chrono::{DateTime, TimeZone, Utc};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAIL_BASE_URL: &str = "https://api.resend.com";
pub const DEFAULT_DB_PATH: &str = "visionary.redb";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Default unseal instant: the last second of 2026.
pub fn default_unseal_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MailConfig {
    pub api_key: String,
    pub from: String,
    pub base_url: String,
}

/// Everything the service reads from its environment, resolved once at
/// startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub secret_key: String,
    pub gemini: GeminiConfig,
    pub mail: MailConfig,
    pub db_path: PathBuf,
    pub port: u16,
    pub unseal_at: DateTime<Utc>,
    pub sweep_interval: Duration,
}

impl Config {
    /// Build from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| VisionaryError::Config(format!("{key} is not set")))
        };

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|e| VisionaryError::Config(format!("PORT '{v}': {e}")))?,
            None => DEFAULT_PORT,
        };

        let unseal_at = match get("VISIONARY_UNSEAL_AT") {
            Some(v) => DateTime::parse_from_rfc3339(v.trim())
                .map_err(|e| VisionaryError::Config(format!("VISIONARY_UNSEAL_AT '{v}': {e}")))?
                .with_timezone(&Utc),
            None => default_unseal_at(),
        };

        let sweep_secs = match get("VISIONARY_SWEEP_INTERVAL_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|e| {
                VisionaryError::Config(format!("VISIONARY_SWEEP_INTERVAL_SECS '{v}': {e}"))
            })?,
            None => DEFAULT_SWEEP_INTERVAL_SECS,
        };
        if sweep_secs == 0 {
            return Err(VisionaryError::Config(
                "VISIONARY_SWEEP_INTERVAL_SECS must be greater than zero".into(),
            ));
        }

        Ok(Self {
            secret_key: required("VISIONARY_SECRET_KEY")?,
            gemini: GeminiConfig {
                api_key: required("GEMINI_API_KEY")?,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            },
            mail: MailConfig {
                api_key: required("MAIL_API_KEY")?,
                from: required("MAIL_FROM")?,
                base_url: get("MAIL_BASE_URL").unwrap_or_else(|| DEFAULT_MAIL_BASE_URL.to_string()),
            },
            db_path: get("VISIONARY_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            port,
            unseal_at,
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }
}
