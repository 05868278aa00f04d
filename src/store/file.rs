// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Peer data persisted as a flat JSON object on disk

use crate::error::{RelationError, Result};
use crate::store::PeerStore;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// Peer data backed by a JSON file, atomically replaced after every mutation
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    #[instrument]
    pub fn open(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Peer data file {} not found, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Loaded {} peer data keys", data.len());

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Write to a temp file next to the target, then rename it into place
    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.data)?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let write = || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(dir)?;
            tmp.write_all(raw.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&self.path).map_err(|e| e.error)?;
            Ok(())
        };

        write().map_err(|e| {
            RelationError::Store(format!(
                "Failed to write peer data to {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl PeerStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if self.data.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.data.clone()
    }
}
