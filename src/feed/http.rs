// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! HTTP surface of the timetable feed.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use log::error;
use serde::{Deserialize, Serialize};

use super::FeedService;

#[derive(Serialize)]
struct ApiError {
    message: String,
}

impl ApiError {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct EventsQuery {
    #[serde(rename = "agendaIds", default)]
    agenda_ids: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

/// Splits the comma-separated agenda list, dropping blank and literal
/// `"null"` segments.
fn parse_agenda_ids(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .map(str::to_string)
        .collect()
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Resolves the optional window. `to` is stretched to the last second of
/// that day so the bound is inclusive.
fn parse_window(
    query: &EventsQuery,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), HttpResponse> {
    let from = match query.from.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match parse_day(raw).and_then(|d| d.and_hms_opt(0, 0, 0)) {
            Some(dt) => Some(dt.and_utc()),
            None => {
                return Err(HttpResponse::BadRequest()
                    .json(ApiError::new("invalid from (YYYY-MM-DD)")))
            }
        },
    };
    let to = match query.to.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match parse_day(raw).and_then(|d| d.and_hms_opt(23, 59, 59)) {
            Some(dt) => Some(dt.and_utc()),
            None => {
                return Err(
                    HttpResponse::BadRequest().json(ApiError::new("invalid to (YYYY-MM-DD)"))
                )
            }
        },
    };
    Ok((from, to))
}

async fn list_events(
    service: web::Data<FeedService>,
    query: web::Query<EventsQuery>,
) -> HttpResponse {
    let agenda_ids = parse_agenda_ids(query.agenda_ids.as_deref());
    if agenda_ids.is_empty() {
        return HttpResponse::BadRequest().json(ApiError::new("agendaIds is required"));
    }
    let (from, to) = match parse_window(&query) {
        Ok(window) => window,
        Err(response) => return response,
    };

    match service.fetch_events(&agenda_ids, from, to).await {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(e) => {
            error!("[timetable] feed fetch failed: {}", e);
            HttpResponse::BadGateway().json(ApiError::new(&e.to_string()))
        }
    }
}

async fn get_event(
    service: web::Data<FeedService>,
    path: web::Path<String>,
    query: web::Query<EventsQuery>,
) -> HttpResponse {
    let id = path.into_inner();
    let agenda_ids = parse_agenda_ids(query.agenda_ids.as_deref());
    if agenda_ids.is_empty() {
        return HttpResponse::BadRequest().json(ApiError::new("agendaIds is required"));
    }
    let (from, to) = match parse_window(&query) {
        Ok(window) => window,
        Err(response) => return response,
    };

    match service.fetch_events(&agenda_ids, from, to).await {
        Ok(events) => match events.into_iter().find(|ev| ev.id == id) {
            Some(event) => HttpResponse::Ok().json(event),
            None => HttpResponse::NotFound().json(ApiError::new("not found")),
        },
        Err(e) => {
            error!("[timetable] feed fetch failed: {}", e);
            HttpResponse::BadGateway().json(ApiError::new(&e.to_string()))
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::get().to(list_events))
        .route("/events/{id}", web::get().to(get_event));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, init_service, TestRequest};
    use actix_web::App;

    #[actix_web::test]
    async fn test_events_requires_agenda_ids() {
        let service = web::Data::new(FeedService::new("http://127.0.0.1:1/cal", "8"));
        let app = init_service(App::new().app_data(service).configure(configure)).await;

        let req = TestRequest::get().uri("/events").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // Blank and "null" segments do not count as ids.
        let req = TestRequest::get()
            .uri("/events?agendaIds=null,%20,")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_events_rejects_bad_dates() {
        let service = web::Data::new(FeedService::new("http://127.0.0.1:1/cal", "8"));
        let app = init_service(App::new().app_data(service).configure(configure)).await;

        let req = TestRequest::get()
            .uri("/events?agendaIds=13295&from=11-10-2025")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_agenda_ids() {
        assert_eq!(
            parse_agenda_ids(Some("13295, 13345,null,,")),
            vec!["13295".to_string(), "13345".to_string()]
        );
        assert!(parse_agenda_ids(None).is_empty());
    }
}
