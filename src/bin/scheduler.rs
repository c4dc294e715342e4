// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scheduler process: polls the timetable on a fixed cadence and publishes
//! event snapshots on the bus. `--once` (or RUN_ONCE) fires a single tick
//! and exits.

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use log::{error, info};

use edtalert::bus::{Bus, EVENTS_STREAM, EVENTS_SUBJECT};
use edtalert::clients::{ConfigClient, TimetableClient};
use edtalert::config::SchedulerSettings;
use edtalert::scheduler::Job;
use edtalert::shutdown;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = SchedulerSettings::parse();
    if let Err(e) = run(settings).await {
        error!("[scheduler] fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(settings: SchedulerSettings) -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::connect(&settings.nats_url).await?;
    bus.ensure_stream(EVENTS_STREAM, EVENTS_STREAM).await?;
    let publisher = bus.publisher(EVENTS_SUBJECT);

    let mut job = Job::new(
        Arc::new(ConfigClient::new(&settings.config_url)),
        Arc::new(TimetableClient::new(&settings.timetable_url)),
        Arc::new(publisher),
    );
    job.from = settings.from.clone();
    job.to = settings.to.clone();

    if settings.run_once() {
        job.run_once().await?;
        return Ok(());
    }

    let token = shutdown::shutdown_token();
    job.run_every(settings.period, token).await;
    info!("[scheduler] stopped");
    Ok(())
}
