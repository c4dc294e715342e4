// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Upstream feed service: fetches the published planning iCal for a set of
//! agendas, normalizes it and applies an optional date window. This is
//! what the Timetable HTTP surface serves.

pub mod http;

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use thiserror::Error;

use crate::ical;
use crate::models::Event;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Default upstream planning endpoint (UCA anonymous calendar export).
pub const DEFAULT_ICAL_BASE: &str = "https://edt.uca.fr/jsp/custom/modules/plannings/anonymous_cal.jsp?projectId=3&calType=ical&displayConfigId=128";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("agendaIds required")]
    NoAgendas,
    #[error("ical fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("ical fetch returned {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },
}

pub struct FeedService {
    base: String,
    weeks: String,
    http: reqwest::Client,
}

impl FeedService {
    pub fn new(base: &str, weeks: &str) -> Self {
        Self {
            base: base.to_string(),
            weeks: weeks.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn build_url(&self, agenda_ids: &[String]) -> String {
        format!(
            "{}&nbWeeks={}&resources={}",
            self.base,
            self.weeks,
            agenda_ids.join(",")
        )
    }

    /// Fetches and normalizes the feed, keeping only events that overlap
    /// the `[from, to]` window when one is given. Events whose end is
    /// unknown are dropped by a `from` bound; events whose start is
    /// unknown survive a `to` bound.
    pub async fn fetch_events(
        &self,
        agenda_ids: &[String],
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Event>, FeedError> {
        if agenda_ids.is_empty() {
            return Err(FeedError::NoAgendas);
        }

        let url = self.build_url(agenda_ids);
        debug!("[feed] fetching {}", url);
        let response = self.http.get(&url).timeout(FETCH_TIMEOUT).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(2048)
                .collect();
            return Err(FeedError::Status { status, detail });
        }

        let body = response.bytes().await?;
        let events = ical::parse(&body, agenda_ids);
        Ok(filter_window(events, from, to))
    }
}

fn filter_window(
    events: Vec<Event>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| {
            if let Some(from) = from {
                match DateTime::parse_from_rfc3339(&event.end) {
                    Ok(end) if end.with_timezone(&Utc) >= from => {}
                    _ => return false,
                }
            }
            if let Some(to) = to {
                if let Ok(start) = DateTime::parse_from_rfc3339(&event.start) {
                    if start.with_timezone(&Utc) > to {
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(start: &str, end: &str) -> Event {
        Event {
            id: "U1".into(),
            start: start.into(),
            end: end.into(),
            ..Default::default()
        }
    }

    fn instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_no_window_keeps_everything() {
        let events = vec![event("2025-11-10T08:00:00Z", "2025-11-10T10:00:00Z")];
        assert_eq!(filter_window(events, None, None).len(), 1);
    }

    #[test]
    fn test_from_drops_events_ended_before() {
        let events = vec![
            event("2025-11-01T08:00:00Z", "2025-11-01T10:00:00Z"),
            event("2025-11-10T08:00:00Z", "2025-11-10T10:00:00Z"),
        ];
        let kept = filter_window(events, Some(instant(2025, 11, 5, 0)), None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start, "2025-11-10T08:00:00Z");
    }

    #[test]
    fn test_to_drops_events_starting_after() {
        let events = vec![
            event("2025-11-01T08:00:00Z", "2025-11-01T10:00:00Z"),
            event("2025-11-10T08:00:00Z", "2025-11-10T10:00:00Z"),
        ];
        let kept = filter_window(events, None, Some(instant(2025, 11, 5, 23)));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start, "2025-11-01T08:00:00Z");
    }

    #[test]
    fn test_unknown_end_is_dropped_by_from_bound() {
        let events = vec![event("2025-11-10T08:00:00Z", "")];
        assert!(filter_window(events, Some(instant(2025, 11, 5, 0)), None).is_empty());
    }

    #[test]
    fn test_build_url_joins_resources() {
        let service = FeedService::new("https://edt.example/cal.jsp?projectId=3", "8");
        let url = service.build_url(&["13295".to_string(), "13345".to_string()]);
        assert_eq!(
            url,
            "https://edt.example/cal.jsp?projectId=3&nbWeeks=8&resources=13295,13345"
        );
    }
}
