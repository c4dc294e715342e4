// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Event snapshots, per-field changes and the alert message that carries
//! them over the bus. All timestamps are RFC-3339 strings in UTC; an empty
//! string means the instant is unknown.

use serde::{Deserialize, Serialize};

/// A normalized calendar entry with a stable UID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// UID from the source feed; sole identity.
    pub id: String,
    /// Agenda identifiers used for the fetch that produced this snapshot.
    #[serde(default)]
    pub agenda_ids: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub last_update: String,
}

/// Which event field a change was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeField {
    Location,
    Start,
    End,
    Title,
    Description,
}

impl ChangeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeField::Location => "location",
            ChangeField::Start => "start",
            ChangeField::End => "end",
            ChangeField::Title => "title",
            ChangeField::Description => "description",
        }
    }

    /// French label used in the plain-text mail body.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeField::Location => "Salle",
            ChangeField::Start => "Début",
            ChangeField::End => "Fin",
            ChangeField::Title => "Titre",
            ChangeField::Description => "Description",
        }
    }
}

/// Classification of a change; subscriptions filter on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    RoomChange,
    TimeChange,
    TitleChange,
    DescriptionChange,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::RoomChange => "room_change",
            ChangeKind::TimeChange => "time_change",
            ChangeKind::TitleChange => "title_change",
            ChangeKind::DescriptionChange => "description_change",
        }
    }
}

/// One field-level difference between two snapshots of the same UID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub field: ChangeField,
    pub kind: ChangeKind,
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    EventNew,
    EventChanged,
}

/// Message published on `ALERTS.upsert` for each new or changed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    #[serde(rename = "type")]
    pub kind: AlertType,
    pub event_id: String,
    #[serde(default)]
    pub agenda_ids: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub location: String,
    /// Empty for `event_new`; non-empty exactly when `event_changed`.
    #[serde(default)]
    pub changes: Vec<Change>,
    /// Pre-rendered plain-text body, used as fallback when template
    /// rendering fails downstream.
    #[serde(default)]
    pub email_text: String,
}
