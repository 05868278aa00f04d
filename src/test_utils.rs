// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for observing peer data mutations.

use crate::error::{RelationError, Result};
use crate::store::{MemoryStore, PeerStore};
use std::collections::BTreeMap;

/// An in-memory peer store that counts every `set` and `delete` call.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: usize,
    sets: usize,
    fail_on_set: Option<usize>,
}

impl RecordingStore {
    /// Start from existing data without counting how it got there
    pub fn wrap(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Empty store whose `n`th `set` call (1-based) fails once
    pub fn failing_on_set(n: usize) -> Self {
        Self {
            fail_on_set: Some(n),
            ..Default::default()
        }
    }

    /// Number of mutating calls made so far, including deletes of absent keys
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PeerStore for RecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.writes += 1;
        self.sets += 1;
        if self.fail_on_set == Some(self.sets) {
            return Err(RelationError::Store("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.writes += 1;
        self.inner.delete(key)
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner.snapshot()
    }
}

/// Relation data as published by a legacy MariaDB leader unit
pub fn legacy_bag(database: &str) -> crate::types::DataBag {
    [
        ("user", "admin"),
        ("password", "s3cret"),
        ("host", "10.0.0.7"),
        ("database", database),
    ]
    .into_iter()
    .collect()
}
