// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! In-memory fakes substituted behind the pipeline's capability traits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use edtalert::bus::{AlertSink, BusError, EventSink};
use edtalert::clients::{ClientError, ConfigApi, MailSender, OutgoingMail, TimetableApi};
use edtalert::models::{Agenda, AlertMessage, Event, Subscription};
use edtalert::store::{SnapshotStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<HashMap<String, Event>>,
}

impl MemoryStore {
    pub fn snapshot(&self, id: &str) -> Option<Event> {
        self.events.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.events.lock().unwrap().get(id).cloned())
    }

    async fn upsert(&self, event: &Event) -> Result<(), StoreError> {
        self.events
            .lock()
            .unwrap()
            .insert(event.id.clone(), event.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAlertSink {
    pub published: Mutex<Vec<AlertMessage>>,
}

impl RecordingAlertSink {
    pub fn take(&self) -> Vec<AlertMessage> {
        std::mem::take(&mut *self.published.lock().unwrap())
    }
}

#[async_trait]
impl AlertSink for RecordingAlertSink {
    async fn publish(&self, alert: &AlertMessage) -> Result<(), BusError> {
        self.published.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEventSink {
    pub published: Mutex<Vec<Event>>,
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn publish(&self, event: &Event) -> Result<(), BusError> {
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Config service fake: per-agenda subscription lists plus the agendas
/// themselves. The unfiltered query returns every subscription.
#[derive(Default)]
pub struct FakeConfig {
    pub agendas: Vec<Agenda>,
    pub subscriptions: HashMap<String, Vec<Subscription>>,
}

impl FakeConfig {
    pub fn with_subscriptions(subs: Vec<Subscription>) -> Self {
        let mut by_agenda: HashMap<String, Vec<Subscription>> = HashMap::new();
        for sub in subs {
            by_agenda
                .entry(sub.agenda_id.clone())
                .or_default()
                .push(sub);
        }
        Self {
            agendas: Vec::new(),
            subscriptions: by_agenda,
        }
    }
}

#[async_trait]
impl ConfigApi for FakeConfig {
    async fn list_agendas(&self) -> Result<Vec<Agenda>, ClientError> {
        Ok(self.agendas.clone())
    }

    async fn list_alerts(&self, agenda_id: Option<&str>) -> Result<Vec<Subscription>, ClientError> {
        match agenda_id {
            Some(id) => Ok(self.subscriptions.get(id).cloned().unwrap_or_default()),
            None => Ok(self.subscriptions.values().flatten().cloned().collect()),
        }
    }
}

#[derive(Default)]
pub struct FakeTimetable {
    pub events: Vec<Event>,
}

#[async_trait]
impl TimetableApi for FakeTimetable {
    async fn list_events(
        &self,
        _agenda_ids: &[String],
        _from: Option<&str>,
        _to: Option<&str>,
    ) -> Result<Vec<Event>, ClientError> {
        Ok(self.events.clone())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn recipients(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.recipient.clone())
            .collect()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), ClientError> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}
