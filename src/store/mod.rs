// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Peer-shared key/value store the leader mirrors relation credentials into.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use std::collections::BTreeMap;

/// Application-level peer data, shared by every unit and written only by the leader.
pub trait PeerStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a key that is not present is not an error.
    fn delete(&mut self, key: &str) -> Result<()>;

    fn snapshot(&self) -> BTreeMap<String, String>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
