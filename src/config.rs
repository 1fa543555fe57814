use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MnemoConfig {
    pub log_level: String,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the memory tree: source files, journal log, and index directory.
    pub memory_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `"hashed"` (offline, deterministic) or `"http"` (Ollama/OpenAI-compatible).
    pub provider: String,
    pub endpoint: String,
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,
}

impl Default for MnemoConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let memory_dir = default_mnemo_dir()
            .join("memory")
            .to_string_lossy()
            .into_owned();
        Self { memory_dir }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hashed".into(),
            endpoint: "http://localhost:11434".into(),
            model: "all-minilm".into(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 5 }
    }
}

/// Returns `~/.mnemo/`
pub fn default_mnemo_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".mnemo")
}

/// Returns the default config file path: `~/.mnemo/config.toml`
pub fn default_config_path() -> PathBuf {
    default_mnemo_dir().join("config.toml")
}

impl MnemoConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MnemoConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MNEMO_DIR, MNEMO_LOG_LEVEL, MNEMO_EMBED_URL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MNEMO_DIR") {
            self.storage.memory_dir = val;
        }
        if let Ok(val) = std::env::var("MNEMO_LOG_LEVEL") {
            self.log_level = val;
        }
        if let Ok(val) = std::env::var("MNEMO_EMBED_URL") {
            self.embedding.endpoint = val;
        }
    }

    /// Resolve the memory directory, expanding `~` if needed.
    pub fn resolved_memory_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.memory_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
