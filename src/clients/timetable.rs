use std::time::Duration;

use async_trait::async_trait;

use super::ClientError;
use crate::models::Event;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Read access to the Timetable service's normalized event list.
#[async_trait]
pub trait TimetableApi: Send + Sync {
    /// Events for the given agendas, optionally windowed by `from`/`to`
    /// (`YYYY-MM-DD`, both inclusive). An empty id list yields no events.
    async fn list_events(
        &self,
        agenda_ids: &[String],
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<Event>, ClientError>;
}

pub struct TimetableClient {
    base: String,
    http: reqwest::Client,
}

impl TimetableClient {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TimetableApi for TimetableClient {
    async fn list_events(
        &self,
        agenda_ids: &[String],
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<Event>, ClientError> {
        if agenda_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = vec![("agendaIds".to_string(), agenda_ids.join(","))];
        if let Some(from) = from.map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("from".to_string(), from.to_string()));
        }
        if let Some(to) = to.map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("to".to_string(), to.to_string()));
        }

        let response = self
            .http
            .get(format!("{}/events", self.base))
            .query(&query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                service: "timetable",
                status,
                detail,
            });
        }
        Ok(response.json().await?)
    }
}
