// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::time::Duration;

use async_trait::async_trait;

use super::ClientError;
use crate::models::{Agenda, Subscription};

/// Read access to the Config service.
#[async_trait]
pub trait ConfigApi: Send + Sync {
    async fn list_agendas(&self) -> Result<Vec<Agenda>, ClientError>;

    /// Subscriptions, optionally filtered by agenda id. `None` returns the
    /// unfiltered list (used for global rules).
    async fn list_alerts(&self, agenda_id: Option<&str>) -> Result<Vec<Subscription>, ClientError>;
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ConfigClient {
    base: String,
    http: reqwest::Client,
}

impl ConfigClient {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn check<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                service: "config",
                status,
                detail,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ConfigApi for ConfigClient {
    async fn list_agendas(&self) -> Result<Vec<Agenda>, ClientError> {
        let response = self
            .http
            .get(format!("{}/agendas", self.base))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        self.check(response).await
    }

    async fn list_alerts(&self, agenda_id: Option<&str>) -> Result<Vec<Subscription>, ClientError> {
        let mut request = self
            .http
            .get(format!("{}/alerts", self.base))
            .timeout(REQUEST_TIMEOUT);
        if let Some(id) = agenda_id {
            request = request.query(&[("agendaId", id)]);
        }
        let response = request.send().await?;
        self.check(response).await
    }
}
