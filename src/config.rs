use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const ENV_DB_PATH: &str = "PARTNER_ADMIN_DB";
pub const ENV_PAGE_SIZE: &str = "PARTNER_ADMIN_PAGE_SIZE";
pub const ENV_COMMISSIONS: &str = "PARTNER_ADMIN_COMMISSIONS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to resolve application directories")]
    NoProjectDirs,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("page size must be a positive integer, got {0:?}")]
    InvalidPageSize(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub page_size: usize,
    pub live_commissions_path: Option<PathBuf>,
    pub log_filter: String,
}

/// Optional overrides read from `config.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
struct ConfigFile {
    db_path: Option<PathBuf>,
    page_size: Option<usize>,
    live_commissions_path: Option<PathBuf>,
    log_filter: Option<String>,
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("com", "partner-portal", "partner-admin").ok_or(ConfigError::NoProjectDirs)
}

pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_local_dir().join("admin.sqlite"))
}

/// WebView profile directory, kept next to the database.
pub fn default_webview_data_dir() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_local_dir().join("webview"))
}

impl AppConfig {
    pub fn with_db_path(db_path: PathBuf) -> Self {
        Self {
            db_path,
            page_size: DEFAULT_PAGE_SIZE,
            live_commissions_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// Defaults, then `config.json` from the config dir, then environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::with_db_path(default_db_path()?);
        config.apply_file(&project_dirs()?.config_dir().join("config.json"))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file");
                return Ok(());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let file: ConfigFile =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(db_path) = file.db_path {
            self.db_path = db_path;
        }
        if let Some(page_size) = file.page_size {
            if page_size == 0 {
                return Err(ConfigError::InvalidPageSize(page_size.to_string()));
            }
            self.page_size = page_size;
        }
        if file.live_commissions_path.is_some() {
            self.live_commissions_path = file.live_commissions_path;
        }
        if let Some(log_filter) = file.log_filter {
            self.log_filter = log_filter;
        }
        Ok(())
    }

    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(db_path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            self.db_path = PathBuf::from(db_path);
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPageSize(raw))?;
        }
        if let Some(path) = lookup(ENV_COMMISSIONS).filter(|v| !v.trim().is_empty()) {
            self.live_commissions_path = Some(PathBuf::from(path));
        }
        Ok(())
    }
}
