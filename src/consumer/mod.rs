// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Diff engine: consumes event snapshots from `EVENTS.>`, compares each
//! against the stored prior version, publishes typed alerts and keeps the
//! store current.
//!
//! Liveness beats delivery here: once a payload decodes, every failure is
//! logged and the message is still acked. The broker's redelivery policy
//! owns retries, not this engine.

pub mod alerts;

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::bus::{self, AlertSink, Bus, BusError, MessageHandler, ALERTS_STREAM, EVENTS_STREAM};
use crate::models::{AlertType, Change, ChangeField, ChangeKind, Event};
use crate::store::SnapshotStore;

pub const DURABLE: &str = "timetable_consumer";

/// Field-level diff between the stored snapshot and the incoming one.
/// Comparison ignores surrounding whitespace; the output order is fixed
/// (location, start, end, title, description) and observable in alerts.
pub fn diff(old: &Event, new: &Event) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut push = |field: ChangeField, kind: ChangeKind, old: &str, new: &str| {
        if old.trim() != new.trim() {
            changes.push(Change {
                field,
                kind,
                old: old.to_string(),
                new: new.to_string(),
            });
        }
    };
    push(ChangeField::Location, ChangeKind::RoomChange, &old.location, &new.location);
    push(ChangeField::Start, ChangeKind::TimeChange, &old.start, &new.start);
    push(ChangeField::End, ChangeKind::TimeChange, &old.end, &new.end);
    push(ChangeField::Title, ChangeKind::TitleChange, &old.title, &new.title);
    push(
        ChangeField::Description,
        ChangeKind::DescriptionChange,
        &old.description,
        &new.description,
    );
    changes
}

/// Per-message pipeline stage; fields are injected so tests run it against
/// in-memory fakes.
pub struct Runner {
    store: Arc<dyn SnapshotStore>,
    alerts: Arc<dyn AlertSink>,
}

impl Runner {
    pub fn new(store: Arc<dyn SnapshotStore>, alerts: Arc<dyn AlertSink>) -> Self {
        Self { store, alerts }
    }

    /// Binds the runner to the bus and consumes until cancellation.
    pub async fn run(&self, bus: &Bus, token: CancellationToken) -> Result<(), BusError> {
        let stream = bus.ensure_stream(EVENTS_STREAM, EVENTS_STREAM).await?;
        // The alerts stream must exist before the first publish.
        bus.ensure_stream(ALERTS_STREAM, ALERTS_STREAM).await?;
        let consumer = bus.ensure_consumer(&stream, DURABLE, None).await?;
        info!("[consumer] consuming {} as durable {}", EVENTS_STREAM, DURABLE);
        bus::consume(consumer, token, self).await
    }
}

#[async_trait]
impl MessageHandler for Runner {
    async fn handle(&self, payload: &[u8]) {
        let event: Event = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(e) => {
                // Poison pill; ack happens in the consume loop.
                warn!("[consumer] dropping undecodable message: {}", e);
                return;
            }
        };

        let old = match self.store.get(&event.id).await {
            Ok(old) => old,
            Err(e) => {
                error!("[consumer] store get failed for {}: {}", event.id, e);
                return;
            }
        };

        let alert = match &old {
            None => Some(alerts::new_event(&event)),
            Some(prev) => {
                let changes = diff(prev, &event);
                if changes.is_empty() {
                    None
                } else {
                    Some(alerts::changed_event(&event, changes))
                }
            }
        };

        if let Some(message) = alert {
            let label = match message.kind {
                AlertType::EventNew => "event_new",
                AlertType::EventChanged => "event_changed",
            };
            info!(
                "[consumer] {} for {} ({} change(s))",
                label,
                event.id,
                message.changes.len()
            );
            if let Err(e) = self.alerts.publish(&message).await {
                error!("[consumer] alert publish failed for {}: {}", event.id, e);
            }
        }

        // Upsert last so the prior version stays readable during the diff.
        if let Err(e) = self.store.upsert(&event).await {
            error!("[consumer] store upsert failed for {}: {}", event.id, e);
        }
    }
}
