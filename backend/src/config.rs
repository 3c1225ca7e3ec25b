//! Environment-driven configuration for the API server and the recipe proxy.
//!
//! Values are read once at startup. Unset or unparsable variables fall back
//! to the defaults below. A `.env` file in the working directory is loaded
//! first; variables already set in the process take precedence over it.

use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_RECIPE_DB_BASE_URL: &str = "https://cosylab.iiitd.edu.in";
pub const DEFAULT_PROXY_PORT: u16 = 3000;
pub const DEFAULT_SERVER_PORT: u16 = 3001;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:nutrition.db";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_RECIPE_PROXY_URL: &str = "http://localhost:3000";
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Browsers commonly cap local storage at 5 MiB per origin
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Settings for the `nutrition-server` binary
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub storage_quota_bytes: usize,
    pub cors_origin: String,
    /// Where the recipe proxy listens; the recipe client talks to it
    pub recipe_proxy_url: String,
    pub export_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parse_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            storage_quota_bytes: env_parse_or("STORAGE_QUOTA_BYTES", DEFAULT_STORAGE_QUOTA_BYTES),
            cors_origin: env_var_or("CORS_ORIGIN", DEFAULT_CORS_ORIGIN),
            recipe_proxy_url: env_var_or("RECIPE_PROXY_URL", DEFAULT_RECIPE_PROXY_URL),
            export_dir: PathBuf::from(env_var_or("EXPORT_DIR", DEFAULT_EXPORT_DIR)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            storage_quota_bytes: DEFAULT_STORAGE_QUOTA_BYTES,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            recipe_proxy_url: DEFAULT_RECIPE_PROXY_URL.to_string(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

/// Settings for the `recipe-proxy` binary
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Upstream origin; inbound paths are appended verbatim
    pub base_url: String,
    /// Injected as a bearer token on every relayed request when present
    pub api_key: Option<String>,
    pub port: u16,
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let base_url = first_non_empty(&["BASE_URL", "RECIPE_DB_BASE_URL"])
            .unwrap_or_else(|| DEFAULT_RECIPE_DB_BASE_URL.to_string());
        let api_key = first_non_empty(&["RECIPEDB_API_KEY", "API_KEY"]);

        Self {
            base_url,
            api_key,
            port: env_parse_or("PROXY_PORT", DEFAULT_PROXY_PORT),
        }
    }
}

/// Load `.env` from the working directory or its parents, if present
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }
}

/// Load a specific env file. Returns false when it is missing or unreadable.
pub fn load_env_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            false
        }
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn first_non_empty(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
