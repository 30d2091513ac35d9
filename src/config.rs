//! Application configuration module
//!
//! Manages application configuration loaded from config.json.
//! Creates a default config file on first run.

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Global configuration instance
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Dictionary policy configuration
    pub dictionary: DictionaryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path
    pub data_dir: String,
    /// Main database file path (relative to data_dir)
    pub db_file: String,
}

/// Dictionary policy configuration.
///
/// These flags are passed into the dictionary core explicitly rather than
/// read as ambient state, so every search/resolve call is a pure function
/// of its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Require a logged-in session for any dictionary access
    pub always_require_login: bool,
    /// Filter crude-tagged signs out of anonymous searches
    pub anon_safe_search: bool,
    /// Show dictionary position and next/previous links on gloss pages
    pub sign_navigation: bool,
    /// Results per page in search output
    pub page_size: usize,
    /// Tag values search may be restricted to; anything else means "all"
    pub categories: Vec<String>,
    /// Tags that may be attached to a gloss
    pub allowed_tags: Vec<String>,
    /// Tag marking signs suppressed by safe search
    pub crude_tag: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            dictionary: DictionaryConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8280,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "signbank.db".to_string(),
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            always_require_login: false,
            anon_safe_search: true,
            sign_navigation: true,
            page_size: 50,
            categories: vec![
                "semantic:health".to_string(),
                "semantic:education".to_string(),
            ],
            allowed_tags: vec![
                "lexis:crude".to_string(),
                "lexis:doubtlex".to_string(),
                "lexis:obsolete".to_string(),
                "lexis:proper name".to_string(),
                "lexis:regional".to_string(),
                "lexis:technical".to_string(),
                "semantic:health".to_string(),
                "semantic:education".to_string(),
                "phonology:alternating".to_string(),
                "phonology:onehand".to_string(),
            ],
            crude_tag: "lexis:crude".to_string(),
        }
    }
}

impl AppConfig {
    /// Get the full database URL
    pub fn get_database_url(&self) -> String {
        let db_path = Path::new(&self.database.data_dir).join(&self.database.db_file);
        format!("sqlite:{}?mode=rwc", db_path.to_string_lossy())
    }

    /// Get the full data directory path
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.database.data_dir)
    }

    /// Get the server bind address
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DictionaryConfig {
    /// Normalize a requested search category to a registered one.
    ///
    /// Unknown or empty tokens fall back to "all" rather than failing.
    pub fn normalize_category<'a>(&'a self, category: &'a str) -> &'a str {
        if category.is_empty() || category == "all" {
            "all"
        } else if self.categories.iter().any(|c| c == category) {
            category
        } else {
            "all"
        }
    }
}

/// Get the config file path
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists
pub fn load_config() -> Result<AppConfig, String> {
    let config_path = get_config_path();

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config(&config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let config_path = get_config_path();

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(&config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Get global configuration instance
pub fn get_config() -> Arc<RwLock<AppConfig>> {
    CONFIG
        .get_or_init(|| {
            let config = load_config().unwrap_or_default();
            Arc::new(RwLock::new(config))
        })
        .clone()
}

/// Get a read-only snapshot of current config
pub fn config() -> AppConfig {
    get_config().read().clone()
}
