// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Host-side event loop around the relation synchronizer.

use crate::config::Config;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::error::{RelationError, Result};
use crate::store::PeerStore;
use crate::sync::synchronizer::{Outcome, RelationSynchronizer};
use crate::types::{DataBag, LegacyCredentials, RelationEvent, RelationId, UnitStatus};
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

/// Events the host delivers to the SyncManager
#[derive(Debug)]
pub enum HostEvent {
    /// A remote unit joined, publishing `data` (possibly empty)
    RelationJoined {
        relation_id: RelationId,
        unit: String,
        data: DataBag,
    },
    /// A remote unit replaced its relation data
    RelationChanged {
        relation_id: RelationId,
        unit: String,
        data: DataBag,
    },
    /// A remote unit left; its data bag is no longer readable
    RelationDeparted { relation_id: RelationId, unit: String },
    RelationBroken { relation_id: RelationId },
    LeaderChanged { is_leader: bool },
    /// Operator query for the mirrored credentials
    GetCredentials {
        reply: oneshot::Sender<Result<LegacyCredentials>>,
    },
}

/// Owns peer data and the live relation data bags, and runs one event at a time.
pub struct SyncManager {
    synchronizer: RelationSynchronizer,
    store: Box<dyn PeerStore>,
    is_leader: bool,
    relations: BTreeMap<RelationId, BTreeMap<String, DataBag>>,
    deferred: VecDeque<RelationEvent>,
    retry_interval: Duration,
    event_rx: mpsc::Receiver<HostEvent>,
    status_tx: watch::Sender<UnitStatus>,
}

/// Handle to send events to the SyncManager
#[derive(Clone)]
pub struct SyncManagerHandle {
    event_tx: mpsc::Sender<HostEvent>,
    status_rx: watch::Receiver<UnitStatus>,
}

impl SyncManagerHandle {
    pub async fn send(&self, event: HostEvent) {
        if let Err(e) = self.event_tx.send(event).await {
            error!("Failed to send event to SyncManager: {}", e);
        }
    }

    /// Ask the manager for the mirrored credentials
    pub async fn get_credentials(&self) -> Result<LegacyCredentials> {
        let (reply, rx) = oneshot::channel();
        self.event_tx
            .send(HostEvent::GetCredentials { reply })
            .await
            .map_err(|_| RelationError::ManagerUnavailable)?;
        rx.await.map_err(|_| RelationError::ManagerUnavailable)?
    }

    /// Last status reported by the manager
    pub fn status(&self) -> UnitStatus {
        self.status_rx.borrow().clone()
    }
}

impl SyncManager {
    pub fn new(config: &Config, store: Box<dyn PeerStore>) -> (Self, SyncManagerHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (status_tx, status_rx) = watch::channel(UnitStatus::Maintenance(
            "waiting for legacy relation".to_string(),
        ));

        let manager = Self {
            synchronizer: RelationSynchronizer::new(config),
            store,
            is_leader: config.initial_leader,
            relations: BTreeMap::new(),
            deferred: VecDeque::new(),
            retry_interval: Duration::from_secs(config.retry_interval_secs.max(1)),
            event_rx,
            status_tx,
        };

        let handle = SyncManagerHandle {
            event_tx,
            status_rx,
        };
        (manager, handle)
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(
            "SyncManager started, leader={}, retry interval {:?}",
            self.is_leader, self.retry_interval
        );

        let mut retry = tokio::time::interval(self.retry_interval);
        retry.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        retry.tick().await;

        loop {
            tokio::select! {
                event = self.event_rx.recv() => match event {
                    Some(event) => {
                        self.redeliver_deferred();
                        self.handle_event(event);
                    }
                    None => break,
                },
                _ = retry.tick() => self.redeliver_deferred(),
            }
        }

        if !self.deferred.is_empty() {
            warn!(
                "SyncManager stopping with {} deferred events",
                self.deferred.len()
            );
        }
        info!("SyncManager stopped, all handles dropped");
        Ok(())
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        debug!("Handling event: {:?}", event);

        match event {
            HostEvent::RelationJoined {
                relation_id,
                unit,
                data,
            } => {
                self.store_data_bag(relation_id, &unit, data);
                self.dispatch(RelationEvent::Joined { relation_id, unit });
            }
            HostEvent::RelationChanged {
                relation_id,
                unit,
                data,
            } => {
                self.store_data_bag(relation_id, &unit, data);
                self.dispatch(RelationEvent::Changed { relation_id, unit });
            }
            HostEvent::RelationDeparted { relation_id, unit } => {
                if let Some(units) = self.relations.get_mut(&relation_id) {
                    units.remove(&unit);
                }
                info!("Unit {} departed relation {}", unit, relation_id);
            }
            HostEvent::RelationBroken { relation_id } => {
                self.relations.remove(&relation_id);
                self.dispatch(RelationEvent::Broken { relation_id });
            }
            HostEvent::LeaderChanged { is_leader } => {
                if is_leader != self.is_leader {
                    info!("Leadership changed, leader={}", is_leader);
                }
                self.is_leader = is_leader;
            }
            HostEvent::GetCredentials { reply } => {
                let result = self.synchronizer.get_credentials(self.store.as_ref());
                if let Err(e) = &result {
                    warn!("Credential query failed: {}", e);
                }
                if reply.send(result).is_err() {
                    warn!("Credential query caller went away before the reply");
                }
            }
        }
    }

    /// Re-run every deferred event once, in the order it was deferred
    pub fn redeliver_deferred(&mut self) {
        if self.deferred.is_empty() {
            return;
        }

        let pending = std::mem::take(&mut self.deferred);
        debug!("Redelivering {} deferred events", pending.len());
        for event in pending {
            self.dispatch(event);
        }
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn store(&self) -> &dyn PeerStore {
        self.store.as_ref()
    }

    fn store_data_bag(&mut self, relation_id: RelationId, unit: &str, data: DataBag) {
        self.relations
            .entry(relation_id)
            .or_default()
            .insert(unit.to_string(), data);
    }

    #[instrument(skip(self, event), fields(kind = event.kind(), relation_id = event.relation_id()))]
    fn dispatch(&mut self, event: RelationEvent) {
        let bag = match &event {
            RelationEvent::Joined { relation_id, unit }
            | RelationEvent::Changed { relation_id, unit } => self
                .relations
                .get(relation_id)
                .and_then(|units| units.get(unit)),
            RelationEvent::Broken { .. } => None,
        };

        let result = self
            .synchronizer
            .handle(&event, bag, self.store.as_mut(), self.is_leader);
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to handle {}: {}", event.kind(), e);
                return;
            }
        };

        debug!("Outcome: {:?}", outcome);

        if outcome.is_deferred() {
            self.deferred.push_back(event);
            return;
        }
        self.apply_status(&outcome);
    }

    fn apply_status(&mut self, outcome: &Outcome) {
        let Some(status) = self.synchronizer.status_for(outcome) else {
            return;
        };
        if *self.status_tx.borrow() == status {
            return;
        }
        if status.is_blocked() {
            warn!("Unit status changed to {}", status);
        } else {
            info!("Unit status changed to {}", status);
        }
        self.status_tx.send_replace(status);
    }
}
