// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mail template rendering.
//!
//! Templates are embedded at build time; there is no file-system lookup at
//! runtime. Each template may start with a front-matter block carrying the
//! subject line, itself a template:
//!
//! ```text
//! ---
//! subject: "..."
//! ---
//! <body template>
//! ```
//!
//! Without the block the subject is empty and the whole file is the body.

use minijinja::{context, Environment};
use thiserror::Error;

use crate::models::{AlertMessage, AlertType};

const EVENT_NEW_TEMPLATE: &str = include_str!("../../templates/event_new.txt");
const EVENT_CHANGED_TEMPLATE: &str = include_str!("../../templates/event_changed.txt");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Splits an optional front-matter block off a template source. Returns
/// `(subject, body)`; both borrow from the input.
pub fn split_front_matter(raw: &str) -> (&str, &str) {
    let rest = match raw.strip_prefix("---\n") {
        Some(rest) => rest,
        None => return ("", raw),
    };
    let end = match rest.find("\n---\n") {
        Some(end) => end,
        None => return ("", raw),
    };
    let header = &rest[..end];
    let body = &rest[end + "\n---\n".len()..];

    let mut subject = "";
    for line in header.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("subject:") {
            subject = value.trim().trim_matches(|c| c == '"' || c == '\'');
            break;
        }
    }
    (subject, body)
}

/// Renders alert subjects and bodies from the embedded templates.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        let (subject, body) = split_front_matter(EVENT_NEW_TEMPLATE);
        env.add_template("event_new_subject", subject)?;
        env.add_template("event_new_body", body)?;
        let (subject, body) = split_front_matter(EVENT_CHANGED_TEMPLATE);
        env.add_template("event_changed_subject", subject)?;
        env.add_template("event_changed_body", body)?;
        Ok(Self { env })
    }

    /// Renders `(subject, body)` for an alert. `event_changed` selects the
    /// change template, everything else the new-event one. Errors surface
    /// to the caller, which falls back to the message's `email_text`.
    pub fn render(&self, msg: &AlertMessage) -> Result<(String, String), RenderError> {
        let key = match msg.kind {
            AlertType::EventChanged => "event_changed",
            _ => "event_new",
        };
        let ctx = context! {
            Title => &msg.title,
            Start => &msg.start,
            End => &msg.end,
            Location => &msg.location,
            Changes => minijinja::value::Value::from_serialize(&msg.changes),
            EmailText => &msg.email_text,
        };
        let subject = self
            .env
            .get_template(&format!("{}_subject", key))?
            .render(&ctx)?;
        let body = self
            .env
            .get_template(&format!("{}_body", key))?
            .render(&ctx)?;
        Ok((subject, body))
    }
}
