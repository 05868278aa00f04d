// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drivers that feed host events into the sync manager.

pub mod stdin;

pub use stdin::{serve, HostCommand};
