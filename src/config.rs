use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory holding rendered `<id>.html` artifacts.
    #[serde(default = "default_articles_dir")]
    pub articles_dir: PathBuf,

    #[serde(default = "default_category")]
    pub default_category: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_summary_sentences")]
    pub summary_sentences: usize,

    pub claude_api_key: Option<String>,

    /// Append-only log file next to stderr output. Empty disables it.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_db_path() -> String {
    "db.sqlite".to_string()
}

fn default_articles_dir() -> PathBuf {
    PathBuf::from("articles")
}

fn default_category() -> String {
    "General".to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_summary_sentences() -> usize {
    3
}

fn default_log_file() -> PathBuf {
    PathBuf::from("app.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            articles_dir: default_articles_dir(),
            default_category: default_category(),
            listen_addr: default_listen_addr(),
            fetch_timeout_secs: default_fetch_timeout(),
            summary_sentences: default_summary_sentences(),
            claude_api_key: None,
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the per-user config file,
    /// writing a default one there on first run.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::load_from(&config_path)
                } else {
                    let config = Config::default();
                    config.save(&config_path)?;
                    Ok(config)
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pocketpp")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.default_category.is_empty() {
            return Err(AppError::Config(
                "default_category must not be empty".to_string(),
            ));
        }
        if self.summary_sentences == 0 {
            return Err(AppError::Config(
                "summary_sentences must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
