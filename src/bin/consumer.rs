// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Consumer process: the diff engine. Reads event snapshots from the bus,
//! keeps the local event store current and publishes categorized alerts.

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use log::{error, info};

use edtalert::bus::{Bus, ALERTS_SUBJECT};
use edtalert::config::ConsumerSettings;
use edtalert::consumer::Runner;
use edtalert::shutdown;
use edtalert::store::SqliteStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = ConsumerSettings::parse();
    if let Err(e) = run(settings).await {
        error!("[consumer] fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(settings: ConsumerSettings) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open(&settings.db_path).await?;
    let bus = Bus::connect(&settings.nats_url).await?;
    let alerts = bus.publisher(ALERTS_SUBJECT);

    let runner = Runner::new(Arc::new(store), Arc::new(alerts));
    let token = shutdown::shutdown_token();
    runner.run(&bus, token).await?;
    info!("[consumer] stopped");
    Ok(())
}
