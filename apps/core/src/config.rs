use std::path::PathBuf;

use anyhow::Result;

/// Portal configuration loaded from environment variables.
///
/// Every variable is optional: with no API key the AI collaborator runs in
/// offline mode, and with no store path state lives in memory only.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API key for the Gemini content generator. May also be supplied at
    /// runtime through the key-value store under `gemini_api_key`.
    pub gemini_api_key: Option<String>,
    /// Path of the JSON file backing the persistent store.
    pub store_path: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            store_path: optional_env("SKILLUP_STORE_PATH").map(PathBuf::from),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
