use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_APPWRITE_ENDPOINT: &str = "https://fra.cloud.appwrite.io/v1";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

const REQUIRED: [&str; 4] = [
    "TMDB_API_KEY",
    "APPWRITE_PROJECT_ID",
    "APPWRITE_DATABASE_ID",
    "APPWRITE_COLLECTION_ID",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub appwrite: AppwriteConfig,
    pub data_dir: PathBuf,
    pub debounce: Duration,
}

#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: Option<String>,
}

pub fn check_env() -> Result<()> {
    for key in REQUIRED {
        if env::var(key).map(|v| v.is_empty()).unwrap_or(true) {
            anyhow::bail!("Missing required environment variable: {}", key);
        }
    }
    info!("All required environment variables are set");
    Ok(())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let debounce_ms = match env::var("CINEDEX_DEBOUNCE_MS") {
            Ok(v) => v
                .parse::<u64>()
                .with_context(|| format!("CINEDEX_DEBOUNCE_MS is not a number: {}", v))?,
            Err(_) => DEFAULT_DEBOUNCE_MS,
        };
        Ok(Self {
            tmdb_api_key: required("TMDB_API_KEY")?,
            appwrite: AppwriteConfig::from_env()?,
            data_dir: env::var("CINEDEX_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            debounce: Duration::from_millis(debounce_ms),
        })
    }
}

impl AppwriteConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: env::var("APPWRITE_ENDPOINT")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_APPWRITE_ENDPOINT.to_string()),
            project_id: required("APPWRITE_PROJECT_ID")?,
            database_id: required("APPWRITE_DATABASE_ID")?,
            collection_id: required("APPWRITE_COLLECTION_ID")?,
            api_key: env::var("APPWRITE_API_KEY").ok().filter(|s| !s.is_empty()),
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .with_context(|| format!("{} not set", key))
}
