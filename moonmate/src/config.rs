//! Application configuration
//!
//! Central location for configuration constants, validation boundaries and
//! the runtime configuration resolved from the environment.

use std::path::PathBuf;
use std::time::Duration;

use directories::{ProjectDirs, UserDirs};

// ===== Storage =====

/// Name of the folder created under the user's Documents directory
pub const APP_DIR_NAME: &str = "MoonMate";

/// File holding the full document list
pub const DOCUMENTS_FILE_NAME: &str = "documents.json";

/// File holding the settings singleton
pub const SETTINGS_FILE_NAME: &str = "settings.json";

// ===== Autosave =====

/// Autosave timer period, also the minimum time between two autosaves.
pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(30);

// ===== Editor Settings Limits =====

/// Smallest editor font size in points
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Largest editor font size in points
pub const MAX_FONT_SIZE: f64 = 72.0;

/// Default editor font size in points
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Default editor font family
pub const DEFAULT_FONT_NAME: &str = "SF Pro";

/// Title given to freshly created documents
pub const DEFAULT_DOCUMENT_TITLE: &str = "Untitled";

// ===== Layout Limits =====

/// Minimum chat sidebar width in logical pixels
pub const MIN_CHAT_SIDEBAR_WIDTH: f64 = 250.0;

/// Maximum chat sidebar width in logical pixels
pub const MAX_CHAT_SIDEBAR_WIDTH: f64 = 500.0;

/// Chat sidebar width on startup
pub const DEFAULT_CHAT_SIDEBAR_WIDTH: f64 = 300.0;

// ===== Text Improvement Service =====

/// Base URL used when none is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Path of the improvement endpoint, appended to the base URL
pub const IMPROVE_TEXT_PATH: &str = "/api/improve-text";

/// Request timeout for the HTTP client
pub const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Simulated latency of the offline client
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_secs(1);

/// Which text-improvement implementation to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientBackend {
    /// Canned local responses, no network
    Mock,
    /// Real service reachable over HTTP
    Http,
}

impl std::str::FromStr for ClientBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(ClientBackend::Mock),
            "http" => Ok(ClientBackend::Http),
            other => Err(format!(
                "Invalid client backend '{}'. Use 'mock' or 'http'",
                other
            )),
        }
    }
}

/// Text-improvement client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend: ClientBackend,
    pub base_url: String,
    pub timeout: Duration,
    pub mock_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: ClientBackend::Mock,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: API_REQUEST_TIMEOUT,
            mock_delay: DEFAULT_MOCK_DELAY,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding documents.json, settings.json and per-document files
    pub data_dir: PathBuf,
    pub client: ClientConfig,
}

impl AppConfig {
    /// Build configuration from `MOONMATE_*` environment variables,
    /// falling back to defaults for anything unset or invalid.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source, e.g. a map in tests
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("MOONMATE_DATA_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let mut client = ClientConfig::default();

        if let Some(backend) = lookup("MOONMATE_CLIENT") {
            match backend.parse() {
                Ok(parsed) => client.backend = parsed,
                Err(e) => tracing::warn!("Ignoring MOONMATE_CLIENT: {}", e),
            }
        }

        if let Some(url) = lookup("MOONMATE_API_URL") {
            client.base_url = url;
        }

        if let Some(delay) = lookup("MOONMATE_MOCK_DELAY_MS") {
            match delay.trim().parse::<u64>() {
                Ok(ms) => client.mock_delay = Duration::from_millis(ms),
                Err(e) => tracing::warn!("Ignoring MOONMATE_MOCK_DELAY_MS: {}", e),
            }
        }

        Self { data_dir, client }
    }
}

/// `~/Documents/MoonMate`, or the platform data dir when there is no
/// Documents folder.
pub fn default_data_dir() -> PathBuf {
    let documents = UserDirs::new().and_then(|dirs| dirs.document_dir().map(PathBuf::from));
    if let Some(documents) = documents {
        return documents.join(APP_DIR_NAME);
    }

    ProjectDirs::from("com", "moonmate", APP_DIR_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME))
}
