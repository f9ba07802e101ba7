use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "plc_sim.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    /// In-range values the simulated controller refuses with a server error.
    pub reject_values: Vec<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:1880".into(),
            reject_values: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    reject_values: Option<Vec<i64>>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// File values override defaults; environment overrides both.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        if let Some(v) = file_cfg.bind_addr {
            settings.bind_addr = v;
        }
        if let Some(v) = file_cfg.reject_values {
            settings.reject_values = v;
        }
    }

    if let Some(v) = env("PLC_SIM_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("PLC_SIM_REJECT") {
        settings.reject_values = parse_value_list(&v);
    }

    Ok(settings)
}

fn parse_value_list(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match part.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(value = part, "ignoring non-numeric entry in PLC_SIM_REJECT");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
