use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

use crate::error::{Error, Result};
use crate::platform::AppPaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub categories: CategoriesConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform-default database location when set.
    pub database_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    /// Overrides the platform-default categories file location when set.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported to MCP clients during initialization.
    pub name: String,
    /// Optional usage instructions returned from initialize.
    pub instructions: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                database_file: None,
            },
            categories: CategoriesConfig { file: None },
            server: ServerConfig {
                name: "spendlog".to_string(),
                instructions: Some(
                    "Record expenses with add_expense, query them with \
                     list_expenses and summarize. Dates are YYYY-MM-DD strings."
                        .to_string(),
                ),
            },
        }
    }
}

impl AppConfig {
    pub async fn load(paths: &AppPaths) -> Result<Self> {
        let config_file = paths.config_file();

        if !config_file.exists() {
            info!("Config file not found, creating default configuration");
            let default_config = Self::default();
            default_config.save(paths).await?;
            return Ok(default_config);
        }

        info!("Loading configuration from: {:?}", config_file);

        let config_content = fs::read_to_string(&config_file).await?;
        let config: AppConfig = toml::from_str(&config_content)
            .map_err(|e| Error::Config(config::ConfigError::Message(e.to_string())))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from an explicit path, e.g. a --config override. Unlike
    /// `load`, a missing file is an error rather than a default.
    pub async fn load_from(path: &std::path::Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let config_content = fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&config_content)
            .map_err(|e| Error::Config(config::ConfigError::Message(e.to_string())))?;

        config.validate()?;

        Ok(config)
    }

    pub async fn save(&self, paths: &AppPaths) -> Result<()> {
        let config_file = paths.config_file();

        info!("Saving configuration to: {:?}", config_file);

        let config_content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(config::ConfigError::Message(e.to_string())))?;

        fs::write(&config_file, config_content).await?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.name.is_empty() {
            return Err(Error::Config(config::ConfigError::Message(
                "server.name must not be empty".to_string(),
            )));
        }

        Ok(())
    }

    /// Database location: explicit config value, or the platform default.
    pub fn database_file(&self, paths: &AppPaths) -> PathBuf {
        self.storage
            .database_file
            .clone()
            .unwrap_or_else(|| paths.database_file())
    }

    /// Categories file location: explicit config value, or the platform default.
    pub fn categories_file(&self, paths: &AppPaths) -> PathBuf {
        self.categories
            .file
            .clone()
            .unwrap_or_else(|| paths.categories_file())
    }
}
