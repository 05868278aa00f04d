// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::fields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric identifier the host assigns to a relation instance
pub type RelationId = u32;

/// Key/value data published by a remote unit on the relation
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct DataBag(BTreeMap<String, String>);

impl DataBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn user(&self) -> Option<&str> {
        self.get(fields::USER)
    }

    pub fn host(&self) -> Option<&str> {
        self.get(fields::HOST)
    }

    pub fn database(&self) -> Option<&str> {
        self.get(fields::DATABASE)
    }
}

impl<K, V> FromIterator<(K, V)> for DataBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DataBag(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A lifecycle notification for the legacy relation.
///
/// Only identifiers are carried; handlers read the live data bag when the
/// event runs, so a redelivered event sees the current relation state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationEvent {
    Joined { relation_id: RelationId, unit: String },
    Changed { relation_id: RelationId, unit: String },
    Broken { relation_id: RelationId },
}

impl RelationEvent {
    pub fn relation_id(&self) -> RelationId {
        match self {
            RelationEvent::Joined { relation_id, .. }
            | RelationEvent::Changed { relation_id, .. }
            | RelationEvent::Broken { relation_id } => *relation_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RelationEvent::Joined { .. } => "relation-joined",
            RelationEvent::Changed { .. } => "relation-changed",
            RelationEvent::Broken { .. } => "relation-broken",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_bag_accessors() {
        let bag: DataBag = [("user", "admin"), ("host", "10.0.0.7")].into_iter().collect();

        assert_eq!(bag.user(), Some("admin"));
        assert_eq!(bag.host(), Some("10.0.0.7"));
        assert_eq!(bag.database(), None);
        assert_eq!(bag.get("password"), None);
    }

    #[test]
    fn test_data_bag_deserializes_from_plain_map() {
        let bag: DataBag =
            serde_json::from_str(r#"{"user":"admin","database":"wordpress"}"#).unwrap();

        assert_eq!(bag.user(), Some("admin"));
        assert_eq!(bag.database(), Some("wordpress"));
    }

    #[test]
    fn test_event_relation_id() {
        let event = RelationEvent::Changed {
            relation_id: 7,
            unit: "mariadb/0".to_string(),
        };
        assert_eq!(event.relation_id(), 7);
        assert_eq!(event.kind(), "relation-changed");
        assert_eq!(RelationEvent::Broken { relation_id: 2 }.relation_id(), 2);
    }
}
