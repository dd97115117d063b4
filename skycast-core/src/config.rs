use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Top-level configuration stored on disk. The only thing persisted is the
/// cached OpenWeatherMap API key.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// api_key = "..."
    pub api_key: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

/// Where the pipeline gets its API key from. The fetch pipeline never talks
/// to the config file or the user directly; it only sees this trait, so the
/// acquisition mechanism (config file, prompt, fixed key) is swappable.
pub trait KeyStore: Send {
    /// The cached key, if any.
    fn get(&self) -> Option<String>;

    /// Replace the cached key.
    fn set(&mut self, key: String) -> Result<()>;
}

/// Key store backed by the on-disk [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigKeyStore {
    config: Config,
}

impl ConfigKeyStore {
    /// Load the store from the platform config directory.
    pub fn load() -> Result<Self> {
        Ok(Self { config: Config::load()? })
    }
}

impl KeyStore for ConfigKeyStore {
    fn get(&self) -> Option<String> {
        self.config.api_key().map(str::to_owned)
    }

    fn set(&mut self, key: String) -> Result<()> {
        self.config.set_api_key(key);
        self.config.save()
    }
}

/// Fixed in-memory key store: environment-provided keys, embedding, tests.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyStore {
    key: Option<String>,
}

impl StaticKeyStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: Some(key.into()) }
    }

    /// A store with no key at all.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl KeyStore for StaticKeyStore {
    fn get(&self) -> Option<String> {
        self.key.clone().filter(|k| !k.is_empty())
    }

    fn set(&mut self, key: String) -> Result<()> {
        self.key = Some(key);
        Ok(())
    }
}
