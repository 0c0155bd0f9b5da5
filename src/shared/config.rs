//! Application configuration. Poll source, export location, remote API.

use serde::Deserialize;

/// Default poll file when `POLL_MANAGE_POLL_PATH` is unset.
pub const DEFAULT_POLL_PATH: &str = "./poll.json";
/// Default directory for CSV exports.
pub const DEFAULT_EXPORT_DIR: &str = "./exports";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// JSON poll file used when no remote API is configured. Read from POLL_MANAGE_POLL_PATH.
    #[serde(default)]
    pub poll_path: Option<String>,

    /// Directory CSV exports are written to. Read from POLL_MANAGE_EXPORT_DIR.
    #[serde(default)]
    pub export_dir: Option<String>,

    /// Zone time slots are displayed in (IANA name). Read from POLL_MANAGE_DISPLAY_TIME_ZONE.
    #[serde(default)]
    pub display_time_zone: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Remote Poll API Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Base URL of the poll API. Read from POLL_MANAGE_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Bearer token for the poll API. Read from POLL_MANAGE_API_TOKEN.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Poll to manage on the remote API. Read from POLL_MANAGE_POLL_ID.
    #[serde(default)]
    pub poll_id: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("POLL_MANAGE"));
        if let Ok(path) = std::env::var("POLL_MANAGE_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn poll_path_or_default(&self) -> String {
        self.poll_path
            .clone()
            .unwrap_or_else(|| DEFAULT_POLL_PATH.to_string())
    }

    pub fn export_dir_or_default(&self) -> String {
        self.export_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_EXPORT_DIR.to_string())
    }

    /// Returns true if the remote poll API should be used instead of the JSON file.
    pub fn is_api_configured(&self) -> bool {
        self.api_url.as_deref().is_some_and(|s| !s.is_empty())
            && self.poll_id.as_deref().is_some_and(|s| !s.is_empty())
    }
}
