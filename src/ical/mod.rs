// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! iCal normalizer.
//!
//! Turns a raw iCal payload into canonical [`Event`] records. Parsing is
//! best-effort: a VEVENT without a UID is skipped, a timestamp that matches
//! none of the known layouts becomes the empty string, and a malformed
//! calendar block never fails the whole batch.

use std::io::BufReader;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use ical::parser::ical::component::IcalEvent;
use ical::IcalParser;
use log::warn;

use crate::models::Event;

/// Parses an iCal payload into normalized events, stamping `agenda_ids`
/// onto every record.
pub fn parse(data: &[u8], agenda_ids: &[String]) -> Vec<Event> {
    let mut out = Vec::new();
    for calendar in IcalParser::new(BufReader::new(data)) {
        let calendar = match calendar {
            Ok(c) => c,
            Err(e) => {
                warn!("[ical] skipping unparsable calendar block: {}", e);
                continue;
            }
        };
        for vevent in &calendar.events {
            let uid = match prop(vevent, "UID") {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => continue,
            };

            out.push(Event {
                id: uid,
                agenda_ids: agenda_ids.to_vec(),
                title: prop(vevent, "SUMMARY").unwrap_or_default().to_string(),
                description: prop(vevent, "DESCRIPTION")
                    .unwrap_or_default()
                    .replace("\\n", "\n"),
                start: prop(vevent, "DTSTART")
                    .map(format_instant)
                    .unwrap_or_default(),
                end: prop(vevent, "DTEND").map(format_instant).unwrap_or_default(),
                location: prop(vevent, "LOCATION").unwrap_or_default().to_string(),
                last_update: prop(vevent, "LAST-MODIFIED")
                    .map(format_instant)
                    .unwrap_or_default(),
            });
        }
    }
    out
}

fn prop<'a>(event: &'a IcalEvent, name: &str) -> Option<&'a str> {
    event
        .properties
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.value.as_deref())
}

/// Parses an iCal timestamp, trying the known layouts in order:
/// Zulu, explicit offset, floating (treated as UTC), date-only (midnight
/// UTC). The first match wins.
pub fn parse_ical_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y%m%dT%H%M%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S") {
        return Some(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y%m%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

/// RFC-3339 in UTC, or the empty string when the value matches no layout.
fn format_instant(value: &str) -> String {
    match parse_ical_time(value) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => String::new(),
    }
}
