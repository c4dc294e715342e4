// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Agendas and alert subscriptions as served by the Config service.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Email target validation pattern
const EMAIL_REGEX: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(EMAIL_REGEX).unwrap();
}

/// A resource identifier accepted by the upstream timetable feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A notification rule bound to an agenda and a recipient.
///
/// An empty `agenda_id` or the literal `"all"` makes the rule global.
/// `condition` is a free string owned by the Config store ("always",
/// "room_change", "time_change", ...); unknown values never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub agenda_id: String,
    pub target: String,
    #[serde(default)]
    pub condition: String,
}

impl Subscription {
    /// Whether the rule applies to every event regardless of agenda.
    pub fn is_global(&self) -> bool {
        self.agenda_id.is_empty() || self.agenda_id == "all"
    }
}

/// Validates an email target. Subscriptions are created by the Config
/// service, which enforces this; the alerter trusts the store.
pub fn is_valid_email(target: &str) -> bool {
    EMAIL_RE.is_match(target)
}
