// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Line-delimited JSON driver: one host command per input line, one reply per query.

use crate::error::Result;
use crate::sync::{HostEvent, SyncManagerHandle};
use crate::types::{DataBag, LegacyCredentials, RelationId};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// A command as read from the input stream
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum HostCommand {
    RelationJoined {
        relation_id: RelationId,
        unit: String,
        #[serde(default)]
        data: DataBag,
    },
    RelationChanged {
        relation_id: RelationId,
        unit: String,
        #[serde(default)]
        data: DataBag,
    },
    RelationDeparted {
        relation_id: RelationId,
        unit: String,
    },
    RelationBroken {
        relation_id: RelationId,
    },
    LeaderChanged {
        is_leader: bool,
    },
    GetCredentials,
}

impl HostCommand {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(line)?))
    }

    /// Convert into a manager event; `GetCredentials` is answered by `serve` itself
    fn into_event(self) -> Option<HostEvent> {
        let event = match self {
            HostCommand::RelationJoined {
                relation_id,
                unit,
                data,
            } => HostEvent::RelationJoined {
                relation_id,
                unit,
                data,
            },
            HostCommand::RelationChanged {
                relation_id,
                unit,
                data,
            } => HostEvent::RelationChanged {
                relation_id,
                unit,
                data,
            },
            HostCommand::RelationDeparted { relation_id, unit } => {
                HostEvent::RelationDeparted { relation_id, unit }
            }
            HostCommand::RelationBroken { relation_id } => HostEvent::RelationBroken { relation_id },
            HostCommand::LeaderChanged { is_leader } => HostEvent::LeaderChanged { is_leader },
            HostCommand::GetCredentials => return None,
        };
        Some(event)
    }
}

fn render_reply(result: Result<LegacyCredentials>) -> Result<String> {
    let reply = match result {
        Ok(creds) => serde_json::to_string(&creds)?,
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    };
    Ok(reply)
}

/// Forward commands from `input` to the manager until end of input
pub async fn serve<R, W>(
    handle: &SyncManagerHandle,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match HostCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping malformed host command: {}", e);
                continue;
            }
        };

        debug!("Received host command: {:?}", command);

        match command.into_event() {
            Some(event) => handle.send(event).await,
            None => {
                let reply = render_reply(handle.get_credentials().await)?;
                output.write_all(reply.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
        }
    }

    debug!("Host command stream closed");
    Ok(())
}
