// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Builds the alert messages published on `ALERTS.upsert`, including the
//! deterministic plain-text body used as fallback when template rendering
//! fails downstream.

use crate::models::{AlertMessage, AlertType, Change, Event};

/// Alert for the first observation of a UID.
pub fn new_event(event: &Event) -> AlertMessage {
    build(event, AlertType::EventNew, Vec::new())
}

/// Alert for a republished UID with at least one field change.
pub fn changed_event(event: &Event, changes: Vec<Change>) -> AlertMessage {
    build(event, AlertType::EventChanged, changes)
}

fn build(event: &Event, kind: AlertType, changes: Vec<Change>) -> AlertMessage {
    let email_text = build_email_text(event, &changes);
    AlertMessage {
        kind,
        event_id: event.id.clone(),
        agenda_ids: event.agenda_ids.clone(),
        title: event.title.clone(),
        start: event.start.clone(),
        end: event.end.clone(),
        location: event.location.clone(),
        changes,
        email_text,
    }
}

/// Deterministic plain-text mail body. Re-running on the same
/// `(event, changes)` pair yields an identical string.
pub fn build_email_text(event: &Event, changes: &[Change]) -> String {
    if changes.is_empty() {
        return format!(
            "Nouveau cours: {}\nQuand: {} → {}\nOù: {}\n",
            event.title, event.start, event.end, event.location
        );
    }
    let mut out = format!(
        "Mise à jour du cours: {}\nQuand: {} → {}\nOù: {}\n\nModifications:\n",
        event.title, event.start, event.end, event.location
    );
    for change in changes {
        out.push_str(&format!(
            "- [{}] {} -> {} ({})\n",
            change.field.label(),
            placeholder(&change.old),
            placeholder(&change.new),
            change.kind.as_str()
        ));
    }
    out
}

fn placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        "—"
    } else {
        value
    }
}
