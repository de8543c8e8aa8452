use std::{fs, io, path::Path};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_filter: String,
    pub inventory_name: String,
    pub initial_items: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "warn".into(),
            inventory_name: "inventory".into(),
            initial_items: Vec::new(),
        }
    }
}

/// Reads `path` if it exists, then applies `APP__*` environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = read_settings_file(path)?;
    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub(crate) fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let Some(raw) = read_if_present(path)? else {
        return Ok(Settings::default());
    };

    toml::from_str(&raw)
        .with_context(|| format!("invalid settings file '{}'", path.display()))
}

/// Writes `items` as `initial_items` into the settings file at `path`,
/// keeping every other key the file already holds.
pub fn persist_items(path: &Path, items: &[String]) -> anyhow::Result<()> {
    let mut table = match read_if_present(path)? {
        Some(raw) => raw
            .parse::<toml::Table>()
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        None => toml::Table::new(),
    };
    table.insert(
        "initial_items".into(),
        toml::Value::Array(items.iter().cloned().map(toml::Value::String).collect()),
    );

    let rendered = toml::to_string_pretty(&table).context("failed to render settings")?;
    fs::write(path, rendered)
        .with_context(|| format!("failed to write settings file '{}'", path.display()))
}

fn read_if_present(path: &Path) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error)
            .with_context(|| format!("failed to read settings file '{}'", path.display())),
    }
}

fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__INVENTORY_NAME") {
        settings.inventory_name = v;
    }
    if let Some(v) = lookup("APP__INITIAL_ITEMS") {
        settings.initial_items = v
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
