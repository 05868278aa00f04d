// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::Result;
use crate::store::PeerStore;
use std::collections::BTreeMap;

/// Peer data held in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MemoryStore {
            data: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl PeerStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.data.clone()
    }
}
