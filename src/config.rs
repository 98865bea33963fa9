//! Process configuration.
//!
//! Loaded once at startup from the environment (and `.env` when present) and
//! handed to the store, the logo fetcher and the report composer.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::report::style::{ReportStyle, RgbColor};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_LOGO_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be a #rrggbb color, got '{value}'")]
    InvalidColor { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string. `None` keeps logs in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Root for `start.html` and the other front-end files.
    pub static_dir: PathBuf,
    /// Empty means any origin is accepted.
    pub allowed_origins: Vec<String>,
    pub logo_fetch_timeout: Duration,
    pub report_style: ReportStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            static_dir: PathBuf::from("."),
            allowed_origins: Vec::new(),
            logo_fetch_timeout: Duration::from_secs(DEFAULT_LOGO_TIMEOUT_SECS),
            report_style: ReportStyle::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let mut report_style = defaults.report_style;
        if let Some(organization) = non_empty_var("REPORT_ORGANIZATION") {
            report_style.organization = organization;
        }
        if let Some(department) = non_empty_var("REPORT_DEPARTMENT") {
            report_style.department = department;
        }
        if let Some(tagline) = non_empty_var("REPORT_FOOTER_TAGLINE") {
            report_style.footer_tagline = tagline;
        }
        if let Some(color) = color_var("REPORT_PRIMARY_COLOR")? {
            report_style.primary = color;
        }
        if let Some(color) = color_var("REPORT_SECONDARY_COLOR")? {
            report_style.secondary = color;
        }
        if let Some(prefix) = non_empty_var("REPORT_FILENAME_PREFIX") {
            report_style.filename_prefix = prefix;
        }

        let allowed_origins = non_empty_var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: non_empty_var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            static_dir: non_empty_var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            allowed_origins,
            logo_fetch_timeout: Duration::from_secs(parse_var(
                "LOGO_FETCH_TIMEOUT_SECS",
                DEFAULT_LOGO_TIMEOUT_SECS,
            )?),
            report_style,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}

fn color_var(name: &'static str) -> Result<Option<RgbColor>, ConfigError> {
    match non_empty_var(name) {
        Some(value) => RgbColor::from_hex(&value)
            .map(Some)
            .ok_or(ConfigError::InvalidColor { name, value }),
        None => Ok(None),
    }
}
