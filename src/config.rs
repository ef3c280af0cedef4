use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub relay: RelayConfig,

    pub client: ClientConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// `text` (default) or `json`
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/noted.db".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Origins allowed to call the API. `"*"` allows any origin, which is what
    /// the extension needs since it calls from arbitrary pages.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Base URL of the notes server used for `SAVE_NOTE` messages.
    pub server_url: String,

    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,

    pub user_agent: String,
}

impl RelayConfig {
    /// `server_url` as a base that endpoint paths join onto, so
    /// `http://host/api` resolves `notes` to `http://host/api/notes`.
    pub fn base_url(&self) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.server_url)
            .with_context(|| format!("Invalid relay server URL: {}", self.server_url))?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3001".to_string(),
            timeout_seconds: 30,
            user_agent: format!("Noted/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Extension-local store (token + per-domain drafts).
    pub store_path: String,

    /// Page-local store shared with the dashboard, read as the sync fallback.
    pub page_store_path: String,

    pub app_name: String,

    pub sync_event: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base = dirs::data_dir().map_or_else(|| PathBuf::from("."), |d| d.join("noted"));

        Self {
            store_path: base.join("extension.json").display().to_string(),
            page_store_path: base.join("page.json").display().to_string(),
            app_name: "noted".to_string(),
            sync_event: "noted-token-sync".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            relay: RelayConfig::default(),
            client: ClientConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("NOTED_DATABASE_URL") {
            self.general.database_path = url;
        }

        if let Ok(port) = std::env::var("NOTED_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid NOTED_PORT: {port}"))?;
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("noted").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".noted").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            anyhow::bail!(
                "Unknown log format '{}', expected 'text' or 'json'",
                self.general.log_format
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.relay.timeout_seconds == 0 {
            anyhow::bail!("Relay timeout must be > 0 seconds");
        }

        self.relay.base_url()?;

        Ok(())
    }
}
