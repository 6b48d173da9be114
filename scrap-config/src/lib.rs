//! Loader for the scrap-journal configuration with file + environment overlays.
//!
//! The configuration file is required: a missing file is a fatal startup
//! error, surfaced before any network activity. Environment variables with
//! the `SCRAP_` prefix override file values, and `${VAR}` placeholders inside
//! values are expanded recursively before deserialization.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level configuration for one journal run.
#[derive(Debug, Deserialize)]
pub struct JournalConfig {
    pub consumer: ConsumerKeys,
    pub twitter: TwitterSection,
    pub scrapbox: ScrapboxSection,
}

/// OAuth1 consumer credentials for the Twitter API.
#[derive(Debug, Deserialize)]
pub struct ConsumerKeys {
    pub key: String,
    pub secret: String,
}

/// Which account to poll.
#[derive(Debug, Deserialize)]
pub struct TwitterSection {
    pub user: String,
}

/// Where the rendered journal is ultimately published.
#[derive(Debug, Deserialize)]
pub struct ScrapboxSection {
    pub project: String,
}

/// Directory holding the config file and durable run state
/// (`~/.config/scrap-journal`).
pub fn state_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrap-journal")
}

/// Default location of the config file: `~/.config/scrap-journal/config.toml`.
pub fn default_config_path() -> PathBuf {
    state_dir().join("config.toml")
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (file + env overrides).
pub struct JournalConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for JournalConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalConfigLoader {
    /// Start with the defaults: `SCRAP_` env overrides, file added separately.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("SCRAP").separator("__"));
        Self { builder }
    }

    /// Attach the config file; the `config` crate infers format by suffix.
    /// The file is required; absence fails [`JournalConfigLoader::load`].
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests to merge inline TOML snippets.
    ///
    /// ```
    /// use scrap_config::JournalConfigLoader;
    ///
    /// let cfg = JournalConfigLoader::new()
    ///     .with_toml_str(
    ///         r#"
    /// [consumer]
    /// key = "ck"
    /// secret = "cs"
    ///
    /// [twitter]
    /// user = "alice"
    ///
    /// [scrapbox]
    /// project = "journal"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.twitter.user, "alice");
    /// assert_eq!(cfg.scrapbox.project, "journal");
    /// ```
    pub fn with_toml_str(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, config::FileFormat::Toml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded (recursively, with a depth cap)
    /// after the sources merge, so secrets can live in the environment while
    /// the file stays checked in.
    pub fn load(self) -> Result<JournalConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: JournalConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
