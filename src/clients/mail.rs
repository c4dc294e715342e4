// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How much of an error body ends up in the log.
const BODY_EXCERPT_LEN: usize = 512;

/// Request payload for the external mail API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), ClientError>;
}

pub struct MailClient {
    base: String,
    token: String,
    debug_payload: bool,
    http: reqwest::Client,
}

impl MailClient {
    pub fn new(base: &str, token: &str, debug_payload: bool) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
            debug_payload,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MailSender for MailClient {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), ClientError> {
        let url = format!("{}/mail", self.base);

        if self.debug_payload {
            debug!(
                "[mailer] POST {} auth={} payload={}",
                url,
                !self.token.is_empty(),
                serde_json::to_string(mail)?
            );
        }

        let mut request = self
            .http
            .post(&url)
            .json(mail)
            .timeout(REQUEST_TIMEOUT);
        if !self.token.is_empty() {
            // The mail API expects the raw token, no "Bearer " prefix.
            request = request.header("Authorization", &self.token);
        }

        let response = request.send().await?;
        let status = response.status();
        // 204 No Content is the only success the API defines.
        if status != reqwest::StatusCode::NO_CONTENT {
            let body = response.text().await.unwrap_or_default();
            let detail: String = body.trim().chars().take(BODY_EXCERPT_LEN).collect();
            return Err(ClientError::Status {
                service: "mail",
                status,
                detail,
            });
        }
        Ok(())
    }
}
