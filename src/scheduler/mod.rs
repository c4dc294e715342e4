// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Poller/publisher: on every tick, enumerates the configured agendas,
//! pulls the current events from the Timetable service and publishes each
//! snapshot on `EVENTS.new`. Ticks are independent; one failed tick never
//! cancels the next.

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::bus::EventSink;
use crate::clients::{ClientError, ConfigApi, TimetableApi};

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("no agendas returned by config")]
    NoAgendas,
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub struct Job {
    config: Arc<dyn ConfigApi>,
    timetable: Arc<dyn TimetableApi>,
    events: Arc<dyn EventSink>,
    /// Optional fetch window, `YYYY-MM-DD`, both inclusive.
    pub from: Option<String>,
    pub to: Option<String>,
}

impl Job {
    pub fn new(
        config: Arc<dyn ConfigApi>,
        timetable: Arc<dyn TimetableApi>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            timetable,
            events,
            from: None,
            to: None,
        }
    }

    /// One tick: list agendas, fetch events for all of them, publish each
    /// snapshot. Individual publish failures are logged and skipped.
    pub async fn run_once(&self) -> Result<(), SchedulerError> {
        let agendas = self.config.list_agendas().await?;
        if agendas.is_empty() {
            return Err(SchedulerError::NoAgendas);
        }

        let ids: Vec<String> = agendas.into_iter().map(|a| a.id).collect();
        let events = self
            .timetable
            .list_events(&ids, self.from.as_deref(), self.to.as_deref())
            .await?;
        info!("[scheduler] fetched {} events for {} agendas", events.len(), ids.len());

        let mut published = 0usize;
        for event in &events {
            match self.events.publish(event).await {
                Ok(()) => published += 1,
                Err(e) => warn!("[scheduler] publish failed for {}: {}", event.id, e),
            }
        }
        info!("[scheduler] published {} events", published);
        Ok(())
    }

    /// Fixed-cadence loop; the first tick fires immediately. Cancellation
    /// stops the ticker at the next wake.
    pub async fn run_every(&self, period: Duration, token: CancellationToken) {
        info!("[scheduler] running every {}", humantime::format_duration(period));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!("[scheduler] tick failed: {}", e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::bus::BusError;
    use crate::models::{Agenda, Event, Subscription};

    struct FakeConfig {
        agendas: Vec<Agenda>,
    }

    #[async_trait]
    impl ConfigApi for FakeConfig {
        async fn list_agendas(&self) -> Result<Vec<Agenda>, ClientError> {
            Ok(self.agendas.clone())
        }
        async fn list_alerts(&self, _: Option<&str>) -> Result<Vec<Subscription>, ClientError> {
            Ok(Vec::new())
        }
    }

    struct FakeTimetable {
        events: Vec<Event>,
        seen_ids: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TimetableApi for FakeTimetable {
        async fn list_events(
            &self,
            agenda_ids: &[String],
            _from: Option<&str>,
            _to: Option<&str>,
        ) -> Result<Vec<Event>, ClientError> {
            self.seen_ids.lock().unwrap().extend(agenda_ids.iter().cloned());
            Ok(self.events.clone())
        }
    }

    #[derive(Default)]
    struct FakeSink {
        published: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl EventSink for FakeSink {
        async fn publish(&self, event: &Event) -> Result<(), BusError> {
            self.published.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn event(id: &str) -> Event {
        Event {
            id: id.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_tick_publishes_every_event() {
        let sink = Arc::new(FakeSink::default());
        let job = Job::new(
            Arc::new(FakeConfig {
                agendas: vec![
                    Agenda { id: "13295".into(), name: "G1".into() },
                    Agenda { id: "13345".into(), name: "G2".into() },
                ],
            }),
            Arc::new(FakeTimetable {
                events: vec![event("U1"), event("U2")],
                seen_ids: Mutex::new(Vec::new()),
            }),
            sink.clone(),
        );
        job.run_once().await.unwrap();
        assert_eq!(sink.published.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_agendas_skips_the_tick() {
        let sink = Arc::new(FakeSink::default());
        let job = Job::new(
            Arc::new(FakeConfig { agendas: Vec::new() }),
            Arc::new(FakeTimetable {
                events: vec![event("U1")],
                seen_ids: Mutex::new(Vec::new()),
            }),
            sink.clone(),
        );
        let err = job.run_once().await.unwrap_err();
        assert!(matches!(err, SchedulerError::NoAgendas));
        assert!(sink.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_agenda_ids_are_passed_to_the_fetch() {
        let timetable = Arc::new(FakeTimetable {
            events: Vec::new(),
            seen_ids: Mutex::new(Vec::new()),
        });
        let job = Job::new(
            Arc::new(FakeConfig {
                agendas: vec![
                    Agenda { id: "1".into(), name: String::new() },
                    Agenda { id: "2".into(), name: String::new() },
                ],
            }),
            timetable.clone(),
            Arc::new(FakeSink::default()),
        );
        job.run_once().await.unwrap();
        assert_eq!(*timetable.seen_ids.lock().unwrap(), vec!["1".to_string(), "2".to_string()]);
    }
}
