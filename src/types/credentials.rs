// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};

/// Credentials mirrored from the legacy relation, as returned by the credential query
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LegacyCredentials {
    pub username: String,
    pub password: String,
    pub host: String,
    pub database: String,
}
