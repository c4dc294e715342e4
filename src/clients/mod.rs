// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! HTTP clients for the external collaborators: the Config service
//! (agendas and subscriptions), the Timetable service (normalized events)
//! and the mail API. Each client is a capability trait plus a reqwest
//! implementation so tests can substitute in-memory fakes.

mod config;
mod mail;
mod timetable;

pub use config::{ConfigApi, ConfigClient};
pub use mail::{MailClient, MailSender, OutgoingMail};
pub use timetable::{TimetableApi, TimetableClient};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{service} returned {status}: {detail}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        detail: String,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
