use std::{fs, io::ErrorKind, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::{http_gateway::DEFAULT_API_BASE_URL, list_controller::DEFAULT_PAGE_SIZE};

pub const DEFAULT_SETTINGS_FILE: &str = "transparent_accounts.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub api_key: String,
    pub page_size: u32,
    pub filter: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            api_key: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            filter: None,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    api_key: Option<String>,
    page_size: Option<u32>,
    filter: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the settings file, then environment overrides.
///
/// Without an explicit `path` the default file is optional; an explicit path
/// must exist.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (file, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_SETTINGS_FILE), false),
    };
    match fs::read_to_string(file) {
        Ok(raw) => merge_file_settings(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", file.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound && !required => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", file.display()))
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn merge_file_settings(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.api_key {
        settings.api_key = v;
    }
    if let Some(v) = file_cfg.page_size {
        settings.page_size = v.max(1);
    }
    if let Some(v) = file_cfg.filter {
        settings.filter = non_empty(v);
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("ACCOUNTS_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("ACCOUNTS_API_KEY") {
        settings.api_key = v;
    }
    if let Some(v) = lookup("APP__API_KEY") {
        settings.api_key = v;
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.page_size = parsed.max(1);
        }
    }

    if let Some(v) = lookup("APP__FILTER") {
        settings.filter = non_empty(v);
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
