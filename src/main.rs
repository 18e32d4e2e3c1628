use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info};

mod app;
mod config;
mod domain;
mod infra;
mod logging;
mod platform;
mod ui;
mod usecase;

#[cfg(test)]
mod tests;

use app::App;
use config::{default_webview_data_dir, AppConfig, DEFAULT_LOG_FILTER};
use logging::init_logging;

fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            init_logging(DEFAULT_LOG_FILTER);
            error!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };
    init_logging(&config.log_filter);

    let webview_data_dir = match webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    };
    info!(db = %config.db_path.display(), "starting partner admin");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Partner Admin"))
                .with_data_directory(webview_data_dir),
        )
        .with_context(config)
        .launch(App);
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create webview dir: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

fn webview_data_dir() -> Result<PathBuf> {
    let dir = default_webview_data_dir()?;
    ensure_dir(&dir)
}
