// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Timetable feed service: serves the normalized upstream iCal feed as
//! JSON events.

use actix_web::{web, App, HttpServer};
use clap::Parser;
use dotenvy::dotenv;
use log::info;

use edtalert::config::TimetableSettings;
use edtalert::feed::{self, FeedService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = TimetableSettings::parse();
    let service = web::Data::new(FeedService::new(&settings.ical_base_url, &settings.weeks));

    info!("[timetable] listening on {}", settings.addr);
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .configure(feed::http::configure)
    })
    .bind(&settings.addr)?
    .run()
    .await
}
