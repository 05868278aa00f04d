// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelationError {
    #[error("Key missing from peer data: {0}")]
    KeyMissing(String),

    #[error("Peer store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sync manager is no longer running")]
    ManagerUnavailable,
}

pub type Result<T> = std::result::Result<T, RelationError>;
