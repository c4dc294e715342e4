// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Thin durable pub/sub wrapper over NATS JetStream.
//!
//! Streams keep messages for 30 days; consumers are durable pull consumers
//! with explicit acknowledgement. Publishing awaits the broker ack under a
//! bounded timeout so a wedged broker surfaces as an error instead of a
//! hung pipeline.

use std::time::Duration;

use async_nats::jetstream::{
    self,
    consumer::{pull, AckPolicy, PullConsumer},
    stream,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::{AlertMessage, Event};

pub const EVENTS_STREAM: &str = "EVENTS";
pub const EVENTS_SUBJECT: &str = "EVENTS.new";
pub const ALERTS_STREAM: &str = "ALERTS";
pub const ALERTS_SUBJECT: &str = "ALERTS.upsert";

/// Messages older than this are discarded by the broker.
const MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// How long a publish waits for the broker ack.
const PUBLISH_ACK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum BusError {
    #[error("NATS connect failed: {0}")]
    Connect(String),
    #[error("stream setup failed: {0}")]
    Stream(String),
    #[error("consumer setup failed: {0}")]
    Consumer(String),
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("publish ack timeout")]
    PublishTimeout,
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle to a JetStream context; one per process.
#[derive(Clone)]
pub struct Bus {
    jetstream: jetstream::Context,
}

impl Bus {
    pub async fn connect(url: &str) -> Result<Self, BusError> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| BusError::Connect(e.to_string()))?;
        Ok(Self {
            jetstream: jetstream::new(client),
        })
    }

    /// Idempotently creates the stream `name` with subjects `<prefix>.>`
    /// and 30-day retention by age.
    pub async fn ensure_stream(&self, name: &str, prefix: &str) -> Result<stream::Stream, BusError> {
        self.jetstream
            .get_or_create_stream(stream::Config {
                name: name.to_string(),
                subjects: vec![format!("{}.>", prefix)],
                max_age: MAX_AGE,
                ..Default::default()
            })
            .await
            .map_err(|e| BusError::Stream(e.to_string()))
    }

    /// Idempotently creates a durable pull consumer with explicit ack.
    /// `filter_subject`, when set, narrows delivery.
    pub async fn ensure_consumer(
        &self,
        stream: &stream::Stream,
        durable: &str,
        filter_subject: Option<&str>,
    ) -> Result<PullConsumer, BusError> {
        let mut config = pull::Config {
            name: Some(durable.to_string()),
            durable_name: Some(durable.to_string()),
            ack_policy: AckPolicy::Explicit,
            ..Default::default()
        };
        if let Some(subject) = filter_subject {
            config.filter_subject = subject.to_string();
        }
        stream
            .get_or_create_consumer(durable, config)
            .await
            .map_err(|e| BusError::Consumer(e.to_string()))
    }

    /// Builds a publisher bound to a fixed subject.
    pub fn publisher(&self, subject: &str) -> Publisher {
        Publisher {
            jetstream: self.jetstream.clone(),
            subject: subject.to_string(),
        }
    }
}

/// Publishes JSON payloads on one subject, awaiting the broker ack.
#[derive(Clone)]
pub struct Publisher {
    jetstream: jetstream::Context,
    subject: String,
}

impl Publisher {
    pub async fn publish_json<T: Serialize>(&self, value: &T) -> Result<(), BusError> {
        let payload = serde_json::to_vec(value)?;
        let ack = self
            .jetstream
            .publish(self.subject.clone(), payload.into())
            .await
            .map_err(|e| BusError::Publish(e.to_string()))?;
        match tokio::time::timeout(PUBLISH_ACK_TIMEOUT, ack).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BusError::Publish(e.to_string())),
            Err(_) => Err(BusError::PublishTimeout),
        }
    }
}

/// Publish capability for event snapshots; the diff engine's input.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &Event) -> Result<(), BusError>;
}

/// Publish capability for alert messages; the alerter's input.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn publish(&self, alert: &AlertMessage) -> Result<(), BusError>;
}

#[async_trait]
impl EventSink for Publisher {
    async fn publish(&self, event: &Event) -> Result<(), BusError> {
        self.publish_json(event).await
    }
}

#[async_trait]
impl AlertSink for Publisher {
    async fn publish(&self, alert: &AlertMessage) -> Result<(), BusError> {
        self.publish_json(alert).await
    }
}

/// Invoked once per delivered message. Implementations own their error
/// policy; every handled message is acked afterwards so a poison payload
/// cannot wedge the stream.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: &[u8]);
}

/// Cooperative consume loop. Runs until the token is cancelled or the
/// message stream ends; an in-flight handler is always drained before
/// returning.
pub async fn consume<H: MessageHandler>(
    consumer: PullConsumer,
    token: CancellationToken,
    handler: &H,
) -> Result<(), BusError> {
    let mut messages = consumer
        .messages()
        .await
        .map_err(|e| BusError::Consumer(e.to_string()))?;

    loop {
        tokio::select! {
            _ = token.cancelled() => return Ok(()),
            next = messages.next() => match next {
                Some(Ok(message)) => {
                    handler.handle(&message.payload).await;
                    if let Err(e) = message.ack().await {
                        warn!("[bus] ack failed: {}", e);
                    }
                }
                Some(Err(e)) => {
                    error!("[bus] message delivery error: {}", e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                None => return Ok(()),
            },
        }
    }
}
