// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{retry, DEFAULT_RELATION_NAME};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Handler configuration loaded from an optional YAML file and environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Database name the remote side must ask for
    pub database_name: String,
    /// Relation name, used as prefix for the peer data keys
    pub relation_name: String,
    /// Report an active status once credentials are synchronized
    pub report_active_on_sync: bool,
    /// Back peer data with a JSON file instead of memory
    pub peer_data_path: Option<PathBuf>,
    pub retry_interval_secs: u64,
    /// Leadership held when the driver starts, until a leader-changed event arrives
    pub initial_leader: bool,
}

/// On-disk shape of the YAML config file; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct FileConfig {
    database_name: Option<String>,
    relation_name: Option<String>,
    report_active_on_sync: Option<bool>,
    peer_data_path: Option<PathBuf>,
    retry_interval_secs: Option<u64>,
    initial_leader: Option<bool>,
}

impl Config {
    pub fn new(database_name: impl Into<String>) -> Self {
        Config {
            database_name: database_name.into(),
            relation_name: DEFAULT_RELATION_NAME.to_string(),
            report_active_on_sync: true,
            peer_data_path: None,
            retry_interval_secs: retry::INTERVAL_SECS,
            initial_leader: false,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, reading `CONFIG_FILE` first when it is set
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup("CONFIG_FILE") {
            Some(path) => read_file(Path::new(&path))?,
            None => FileConfig::default(),
        };

        let database_name = lookup("LEGACY_DATABASE_NAME")
            .or(file.database_name)
            .context("LEGACY_DATABASE_NAME environment variable not set")?;

        let mut config = Config::new(database_name);

        if let Some(name) = lookup("LEGACY_RELATION_NAME").or(file.relation_name) {
            config.relation_name = name;
        }
        config.report_active_on_sync =
            parse_or("REPORT_ACTIVE_ON_SYNC", &lookup, file.report_active_on_sync)?
                .unwrap_or(true);
        config.peer_data_path = lookup("PEER_DATA_PATH")
            .map(PathBuf::from)
            .or(file.peer_data_path);
        if let Some(secs) = parse_or("RETRY_INTERVAL_SECS", &lookup, file.retry_interval_secs)? {
            config.retry_interval_secs = secs;
        }
        config.initial_leader =
            parse_or("INITIAL_LEADER", &lookup, file.initial_leader)?.unwrap_or(false);

        Ok(config)
    }
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn parse_or<T, F>(key: &str, lookup: &F, fallback: Option<T>) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: {}", key, raw)),
        None => Ok(fallback),
    }
}
