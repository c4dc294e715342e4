// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Alerter: consumes alert messages, resolves the subscribers that asked
//! for them, renders the mail and calls the external mail API.
//!
//! Recipient resolution is two-pass: subscriptions attached to each agenda
//! carried by the alert, then the unfiltered list for global rules
//! (`agenda_id` empty or `"all"`). Recipients are deduplicated by email
//! before any send.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::bus::{self, Bus, BusError, MessageHandler, ALERTS_STREAM, ALERTS_SUBJECT};
use crate::clients::{ConfigApi, MailSender, OutgoingMail};
use crate::models::{AlertMessage, AlertType, Change};
use crate::render::Renderer;

pub const DURABLE: &str = "alerter_consumer";

/// Subject used when template rendering fails and the alert's
/// pre-rendered text takes over.
const FALLBACK_SUBJECT: &str = "[EDT] Notification";

/// Whether a subscription condition matches an alert.
///
/// `teacher_change` is accepted by the Config service but the diff engine
/// never emits that kind (teacher is not a normalized field), so the rule
/// never fires today. Flagged to the product owner; do not map it here.
pub fn should_notify(condition: &str, changes: &[Change], kind: AlertType) -> bool {
    match condition {
        "" | "always" => true,
        "new_event" => kind == AlertType::EventNew,
        "room_change" | "time_change" | "title_change" | "description_change" => changes
            .iter()
            .any(|change| change.kind.as_str() == condition),
        _ => false,
    }
}

pub struct Runner {
    config: Arc<dyn ConfigApi>,
    mailer: Arc<dyn MailSender>,
    renderer: Renderer,
}

impl Runner {
    pub fn new(config: Arc<dyn ConfigApi>, mailer: Arc<dyn MailSender>, renderer: Renderer) -> Self {
        Self {
            config,
            mailer,
            renderer,
        }
    }

    /// Binds the runner to the bus and consumes `ALERTS.upsert` until
    /// cancellation.
    pub async fn run(&self, bus: &Bus, token: CancellationToken) -> Result<(), BusError> {
        let stream = bus.ensure_stream(ALERTS_STREAM, ALERTS_STREAM).await?;
        let consumer = bus
            .ensure_consumer(&stream, DURABLE, Some(ALERTS_SUBJECT))
            .await?;
        info!("[alerter] consuming {} as durable {}", ALERTS_SUBJECT, DURABLE);
        bus::consume(consumer, token, self).await
    }

    /// Collects the deduplicated recipient set for one alert.
    async fn resolve_recipients(&self, msg: &AlertMessage) -> BTreeSet<String> {
        let mut recipients = BTreeSet::new();

        for agenda_id in &msg.agenda_ids {
            match self.config.list_alerts(Some(agenda_id)).await {
                Ok(subs) => {
                    for sub in subs {
                        if should_notify(&sub.condition, &msg.changes, msg.kind) {
                            recipients.insert(sub.target);
                        }
                    }
                }
                Err(e) => {
                    warn!("[alerter] subscription fetch failed for agenda {}: {}", agenda_id, e);
                }
            }
        }

        match self.config.list_alerts(None).await {
            Ok(subs) => {
                for sub in subs {
                    if sub.is_global() && should_notify(&sub.condition, &msg.changes, msg.kind) {
                        recipients.insert(sub.target);
                    }
                }
            }
            Err(e) => {
                warn!("[alerter] global subscription fetch failed: {}", e);
            }
        }

        recipients
    }
}

#[async_trait]
impl MessageHandler for Runner {
    async fn handle(&self, payload: &[u8]) {
        let msg: AlertMessage = match serde_json::from_slice(payload) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("[alerter] dropping undecodable message: {}", e);
                return;
            }
        };

        let recipients = self.resolve_recipients(&msg).await;
        if recipients.is_empty() {
            return;
        }

        let (subject, body) = match self.renderer.render(&msg) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!("[alerter] template render failed, using fallback: {}", e);
                (FALLBACK_SUBJECT.to_string(), msg.email_text.clone())
            }
        };

        for recipient in recipients {
            let mail = OutgoingMail {
                recipient: recipient.clone(),
                subject: subject.clone(),
                content: body.clone(),
            };
            match self.mailer.send(&mail).await {
                Ok(()) => info!("[alerter] sent to {}", recipient),
                Err(e) => error!("[alerter] send to {} failed: {}", recipient, e),
            }
        }
    }
}
