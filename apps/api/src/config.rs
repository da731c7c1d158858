use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::generation::format::OutputFormat;

/// S3 / MinIO settings; present only when `S3_BUCKET` is set.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Output directory for the local store.
    pub generated_dir: PathBuf,
    /// Default resolution number prefix when a request does not supply one.
    pub resolution_prefix: String,
    /// Format of generated resolutions and summaries (`docx` unless set).
    pub output_format: OutputFormat,
    pub s3: Option<S3Config>,
    pub organization_profile: Option<PathBuf>,
    pub city: Option<String>,
    pub signatory_name: Option<String>,
    pub signatory_title: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3 = match optional_env("S3_BUCKET") {
            Some(bucket) => Some(S3Config {
                bucket,
                endpoint: require_env("S3_ENDPOINT")?,
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            generated_dir: optional_env("GENERATED_DIR")
                .unwrap_or_else(|| "generated".to_string())
                .into(),
            resolution_prefix: std::env::var("RESOLUTION_PREFIX")
                .unwrap_or_else(|_| "15-".to_string()),
            output_format: match optional_env("OUTPUT_FORMAT") {
                Some(name) => OutputFormat::from_name(&name)
                    .ok_or_else(|| anyhow!("OUTPUT_FORMAT must be docx or html, got '{name}'"))?,
                None => OutputFormat::Docx,
            },
            s3,
            organization_profile: optional_env("ORGANIZATION_PROFILE").map(PathBuf::from),
            city: optional_env("CITY"),
            signatory_name: optional_env("SIGNATORY_NAME"),
            signatory_title: optional_env("SIGNATORY_TITLE"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
