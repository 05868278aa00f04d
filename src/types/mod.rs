// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Relation data, lifecycle events and reported status.

pub mod credentials;
pub mod relation;
pub mod status;

pub use credentials::LegacyCredentials;
pub use relation::{DataBag, RelationEvent, RelationId};
pub use status::UnitStatus;
