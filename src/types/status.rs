// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fmt;

/// Workload status reported to operators
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitStatus {
    Active,
    Blocked(String),
    Maintenance(String),
}

impl UnitStatus {
    pub fn is_blocked(&self) -> bool {
        matches!(self, UnitStatus::Blocked(_))
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitStatus::Active => write!(f, "active"),
            UnitStatus::Blocked(msg) => write!(f, "blocked: {}", msg),
            UnitStatus::Maintenance(msg) => write!(f, "maintenance: {}", msg),
        }
    }
}
