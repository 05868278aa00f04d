// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tokio::io::{stdin, stdout, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use legacy_relation::config::Config;
use legacy_relation::host;
use legacy_relation::store::{FileStore, MemoryStore, PeerStore};
use legacy_relation::sync::SyncManager;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries query replies
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting legacy relation handler");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: relation={}, database={}",
        config.relation_name, config.database_name
    );

    let store: Box<dyn PeerStore> = match &config.peer_data_path {
        Some(path) => {
            info!("Using peer data file {}", path.display());
            Box::new(FileStore::open(path)?)
        }
        None => Box::new(MemoryStore::new()),
    };

    let (sync_manager, sync_handle) = SyncManager::new(&config, store);

    let driver = async move {
        let result = host::serve(&sync_handle, BufReader::new(stdin()), stdout()).await;
        // Dropping the last handle stops the sync manager
        drop(sync_handle);
        result
    };

    tokio::try_join!(sync_manager.run(), driver)?;

    info!("Input closed, shutting down");
    Ok(())
}
