// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Fields read from the remote unit's relation data bag
pub mod fields {
    pub const USER: &str = "user";
    pub const PASSWORD: &str = "password";
    pub const HOST: &str = "host";
    pub const DATABASE: &str = "database";

    /// Every credential field mirrored into peer data, in write order
    pub const ALL: [&str; 4] = [USER, PASSWORD, HOST, DATABASE];
}

/// Peer data flag that triggers the common post-relation tasks
pub const DATABASE_START: &str = "database-start";

/// Relation name used as key prefix when none is configured
pub const DEFAULT_RELATION_NAME: &str = "mysql";

/// Status message shown when the remote side asks for another database
pub const WRONG_DATABASE_MESSAGE: &str = "Wrong database name";

/// Deferred event redelivery
pub mod retry {
    /// Default interval in seconds between redelivery passes
    pub const INTERVAL_SECS: u64 = 10;
}

/// Capacity of the host event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
