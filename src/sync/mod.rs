// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Legacy relation synchronization logic.

pub mod manager;
pub mod synchronizer;

pub use manager::{HostEvent, SyncManager, SyncManagerHandle};
pub use synchronizer::{IgnoreReason, Outcome, RelationSynchronizer};
