//! Config file discovery, loading, and environment variable overlay.

use crate::{BeatConfig, ConfigError};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

const SYSTEM_FILE: &str = "/etc/beatbuddy/config.toml";
const USER_FILE: &str = "beatbuddy/config.toml";
const LOCAL_FILE: &str = "beatbuddy.toml";

/// Every location consulted, in load order: system, user, then local.
///
/// An existing `cli_path` takes the local file's place. A missing one is
/// ignored and the local file is used instead.
pub fn config_candidates(cli_path: Option<&Path>) -> Vec<PathBuf> {
    // XDG_CONFIG_HOME or ~/.config
    let user = directories::BaseDirs::new().map(|d| d.config_dir().join(USER_FILE));
    let local = match cli_path {
        Some(path) if path.exists() => path.to_path_buf(),
        _ => PathBuf::from(LOCAL_FILE),
    };

    [Some(PathBuf::from(SYSTEM_FILE)), user, Some(local)]
        .into_iter()
        .flatten()
        .collect()
}

/// The candidates that exist, in load order.
pub fn discover_config_files(cli_path: Option<&Path>) -> Vec<PathBuf> {
    config_candidates(cli_path)
        .into_iter()
        .filter(|p| p.is_file())
        .collect()
}

/// Read and merge the given files in order, later files winning per key.
pub fn load_files(files: &[PathBuf]) -> Result<(BeatConfig, ConfigSources), ConfigError> {
    let mut sources = ConfigSources::default();
    let mut merged = toml::Table::new();

    for path in files {
        let table = read_table(path)?;
        merge_tables(&mut merged, table);
        sources.files.push(path.clone());
    }

    let origin = files.last().cloned().unwrap_or_default();
    let config = toml::Value::Table(merged)
        .try_into::<BeatConfig>()
        .map_err(|e| ConfigError::Parse {
            path: origin,
            message: e.to_string(),
        })?;

    Ok((config, sources))
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_table(&contents, path)
}

/// Parse a TOML document and check it against the config shape.
fn parse_table(contents: &str, path: &Path) -> Result<toml::Table, ConfigError> {
    let table: toml::Table = contents
        .parse()
        .map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // Catch type errors here so they are reported against the file that has them.
    toml::Value::Table(table.clone())
        .try_into::<BeatConfig>()
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(table)
}

/// Deep-merge `overlay` into `base`. Nested tables merge, everything else replaces.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut BeatConfig, sources: &mut ConfigSources) {
    apply_overrides(config, sources, |key| env::var(key).ok());
}

/// Apply overrides from an arbitrary variable lookup.
pub fn apply_overrides<F>(config: &mut BeatConfig, sources: &mut ConfigSources, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let overrides = &mut sources.env_overrides;

    if let Some(v) = lookup("OPENAI_API_KEY") {
        config.openai.api_key = Some(v);
        overrides.push("OPENAI_API_KEY".to_string());
    }
    if let Some(v) = lookup("OPENAI_BASE_URL") {
        config.openai.base_url = v;
        overrides.push("OPENAI_BASE_URL".to_string());
    }
    if let Some(v) = lookup("BEATBUDDY_MODEL") {
        config.openai.model = v;
        overrides.push("BEATBUDDY_MODEL".to_string());
    }

    if let Some(v) = lookup("LASTFM_API_KEY") {
        config.lastfm.api_key = Some(v);
        overrides.push("LASTFM_API_KEY".to_string());
    }
    if let Some(v) = lookup("LASTFM_BASE_URL") {
        config.lastfm.base_url = v;
        overrides.push("LASTFM_BASE_URL".to_string());
    }

    if let Some(v) = lookup("BEATBUDDY_TEMPERATURE") {
        if let Ok(t) = v.parse() {
            config.assistant.temperature = t;
            overrides.push("BEATBUDDY_TEMPERATURE".to_string());
        }
    }

    if let Some(v) = lookup("BEATBUDDY_LOG_LEVEL") {
        config.telemetry.log_level = v;
        overrides.push("BEATBUDDY_LOG_LEVEL".to_string());
    }
    // RUST_LOG wins over everything
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        overrides.push("RUST_LOG".to_string());
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
