use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::UserSort;

pub const DEFAULT_CONFIG_PATH: &str = "admin.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub catalog_path: Option<PathBuf>,
    pub user_sort: UserSort,
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080/docs/api".into(),
            catalog_path: None,
            user_sort: UserSort::default(),
            timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs)
    }
}

/// Every key is optional; absent keys keep the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_url: Option<String>,
    catalog_path: Option<PathBuf>,
    user_sort_column: Option<u32>,
    user_sort_asc: Option<bool>,
    timeout_secs: Option<u64>,
}

/// Defaults, then the TOML file (if present), then environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.catalog_path {
        settings.catalog_path = Some(v);
    }
    if let Some(v) = file_cfg.user_sort_column {
        settings.user_sort.column = v;
    }
    if let Some(v) = file_cfg.user_sort_asc {
        settings.user_sort.ascending = v;
    }
    if let Some(v) = file_cfg.timeout_secs {
        settings.timeout_secs = Some(v);
    }
    Ok(())
}

/// `APP__*` wins over the legacy `DOCS_API_URL`. Unparseable numbers are ignored.
fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("DOCS_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = var("APP__CATALOG_PATH") {
        settings.catalog_path = Some(PathBuf::from(v));
    }

    if let Some(v) = var("APP__USER_SORT_COLUMN") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.user_sort.column = parsed;
        }
    }
    if let Some(v) = var("APP__USER_SORT_ASC") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.user_sort.ascending = parsed;
        }
    }

    if let Some(v) = var("APP__TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.timeout_secs = Some(parsed);
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
