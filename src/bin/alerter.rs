// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Alerter process: turns alert messages into rendered mails for every
//! matching subscriber.

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use log::{error, info};

use edtalert::alerter::Runner;
use edtalert::bus::Bus;
use edtalert::clients::{ConfigClient, MailClient};
use edtalert::config::AlerterSettings;
use edtalert::render::Renderer;
use edtalert::shutdown;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = AlerterSettings::parse();
    if let Err(e) = run(settings).await {
        error!("[alerter] fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(settings: AlerterSettings) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(ConfigClient::new(&settings.config_url));
    let mailer = Arc::new(MailClient::new(
        &settings.mail_api_url,
        &settings.mail_token,
        settings.debug_payload(),
    ));
    let renderer = Renderer::new()?;

    let bus = Bus::connect(&settings.nats_url).await?;
    let runner = Runner::new(config, mailer, renderer);
    let token = shutdown::shutdown_token();
    runner.run(&bus, token).await?;
    info!("[alerter] stopped");
    Ok(())
}
