// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Mirrors legacy relation credentials into peer data.
//!
//! On the legacy protocol the remote leader publishes `user`, `password`,
//! `host` and `database` on its own unit data bag. The local leader copies
//! them into peer data under the relation name prefix so every unit can
//! read them, and removes them again when the relation is broken.

use crate::config::Config;
use crate::constants::{fields, DATABASE_START, WRONG_DATABASE_MESSAGE};
use crate::error::{RelationError, Result};
use crate::store::PeerStore;
use crate::types::{DataBag, LegacyCredentials, RelationEvent, UnitStatus};
use tracing::{debug, error, info, warn};

/// Why an event left peer data untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotLeader,
    /// The relation departed between the event being queued and handled
    RelationVanished,
    AlreadySynchronized,
    /// The remote unit has not exposed a host to this unit
    HostNotPublished,
    /// Credentials were never mirrored, so there is no host to refresh
    NotSynchronized,
}

/// Result of handling one lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored(IgnoreReason),
    /// Remote data is not there yet; the same event must be redelivered later
    Defer,
    Synchronized,
    HostRefreshed,
    Cleared,
    Blocked(String),
}

impl Outcome {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Outcome::Defer)
    }
}

/// Leader-gated handlers for the legacy database relation
#[derive(Debug, Clone)]
pub struct RelationSynchronizer {
    database_name: String,
    relation_name: String,
    report_active_on_sync: bool,
}

impl RelationSynchronizer {
    pub fn new(config: &Config) -> Self {
        Self {
            database_name: config.database_name.clone(),
            relation_name: config.relation_name.clone(),
            report_active_on_sync: config.report_active_on_sync,
        }
    }

    /// Peer data key for a credential field, e.g. `mysql-user`
    pub fn key(&self, field: &str) -> String {
        format!("{}-{}", self.relation_name, field)
    }

    /// Route a lifecycle event to its handler.
    ///
    /// `bag` is the remote unit's data as it is now, or `None` once the
    /// relation is gone.
    pub fn handle<S>(
        &self,
        event: &RelationEvent,
        bag: Option<&DataBag>,
        store: &mut S,
        is_leader: bool,
    ) -> Result<Outcome>
    where
        S: PeerStore + ?Sized,
    {
        match event {
            RelationEvent::Joined { .. } => self.on_joined(bag, store, is_leader),
            RelationEvent::Changed { .. } => self.on_changed(bag, store, is_leader),
            RelationEvent::Broken { .. } => self.on_broken(store, is_leader),
        }
    }

    pub fn on_joined<S>(
        &self,
        bag: Option<&DataBag>,
        store: &mut S,
        is_leader: bool,
    ) -> Result<Outcome>
    where
        S: PeerStore + ?Sized,
    {
        if !is_leader {
            return Ok(Outcome::Ignored(IgnoreReason::NotLeader));
        }

        let Some(bag) = bag else {
            debug!("Relation departed");
            return Ok(Outcome::Ignored(IgnoreReason::RelationVanished));
        };

        let Some(user) = bag.user() else {
            if store.contains(&self.key(fields::USER))? {
                debug!("Legacy relation already synchronized");
                return Ok(Outcome::Ignored(IgnoreReason::AlreadySynchronized));
            }
            debug!("Legacy relation data not ready yet, deferring event");
            return Ok(Outcome::Defer);
        };

        let database = bag.database().unwrap_or_default();
        if database != self.database_name {
            error!(
                "Database name must be set to `{}`, remote side asked for `{}`",
                self.database_name, database
            );
            return Ok(Outcome::Blocked(WRONG_DATABASE_MESSAGE.to_string()));
        }

        // `user` goes last: its presence marks the relation as synchronized
        let values = [
            (fields::PASSWORD, bag.get(fields::PASSWORD).unwrap_or_default()),
            (fields::HOST, bag.host().unwrap_or_default()),
            (fields::DATABASE, database),
            (fields::USER, user),
        ];
        if let Err(e) = self.write_credentials(store, &values) {
            error!("Failed to write legacy credentials, deferring event: {}", e);
            self.roll_back(store, &values);
            return Ok(Outcome::Defer);
        }

        info!(
            "Synchronized legacy credentials for user {} on database {}",
            user, database
        );
        Ok(Outcome::Synchronized)
    }

    pub fn on_changed<S>(
        &self,
        bag: Option<&DataBag>,
        store: &mut S,
        is_leader: bool,
    ) -> Result<Outcome>
    where
        S: PeerStore + ?Sized,
    {
        if !is_leader {
            return Ok(Outcome::Ignored(IgnoreReason::NotLeader));
        }

        // Only the remote leader's data bag is populated on the legacy protocol
        let Some(host) = bag.and_then(DataBag::host) else {
            debug!("No host in relation data, nothing to refresh");
            return Ok(Outcome::Ignored(IgnoreReason::HostNotPublished));
        };

        if !store.contains(&self.key(fields::USER))? {
            debug!("Legacy relation not synchronized yet, skipping host refresh");
            return Ok(Outcome::Ignored(IgnoreReason::NotSynchronized));
        }

        store.set(&self.key(fields::HOST), host)?;
        info!("Refreshed legacy relation host to {}", host);
        Ok(Outcome::HostRefreshed)
    }

    pub fn on_broken<S>(&self, store: &mut S, is_leader: bool) -> Result<Outcome>
    where
        S: PeerStore + ?Sized,
    {
        if !is_leader {
            return Ok(Outcome::Ignored(IgnoreReason::NotLeader));
        }

        for field in fields::ALL {
            store.delete(&self.key(field))?;
        }

        info!("Cleared legacy credentials from peer data");
        Ok(Outcome::Cleared)
    }

    /// Read the mirrored credentials, failing on the first missing key
    pub fn get_credentials<S>(&self, store: &S) -> Result<LegacyCredentials>
    where
        S: PeerStore + ?Sized,
    {
        let read = |field: &str| -> Result<String> {
            let key = self.key(field);
            store.get(&key)?.ok_or(RelationError::KeyMissing(key))
        };

        Ok(LegacyCredentials {
            username: read(fields::USER)?,
            password: read(fields::PASSWORD)?,
            host: read(fields::HOST)?,
            database: read(fields::DATABASE)?,
        })
    }

    fn write_credentials<S>(&self, store: &mut S, values: &[(&str, &str)]) -> Result<()>
    where
        S: PeerStore + ?Sized,
    {
        for (field, value) in values {
            store.set(&self.key(field), value)?;
        }
        store.set(DATABASE_START, "true")
    }

    /// Remove whatever part of `values` made it into the store
    fn roll_back<S>(&self, store: &mut S, values: &[(&str, &str)])
    where
        S: PeerStore + ?Sized,
    {
        for (field, _) in values {
            let key = self.key(field);
            if let Err(e) = store.delete(&key) {
                warn!("Failed to roll back {}: {}", key, e);
            }
        }
    }

    /// Status change an outcome should produce, if any
    pub fn status_for(&self, outcome: &Outcome) -> Option<UnitStatus> {
        match outcome {
            Outcome::Synchronized if self.report_active_on_sync => Some(UnitStatus::Active),
            Outcome::Blocked(msg) => Some(UnitStatus::Blocked(msg.clone())),
            _ => None,
        }
    }
}
