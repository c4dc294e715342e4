//! Per-service settings. Every knob is an environment variable and a CLI
//! flag; flags win. Durations use the compact form ("10m", "1h").

use std::time::Duration;

use clap::Parser;

use crate::feed;

#[derive(Parser, Debug, Clone)]
#[command(name = "edtalert-timetable", about = "Normalized timetable feed over HTTP")]
pub struct TimetableSettings {
    #[arg(long, env = "TIMETABLE_ADDR", default_value = "0.0.0.0:8081")]
    pub addr: String,

    /// Upstream planning export, without the resources parameter.
    #[arg(long, env = "ICAL_BASE_URL", default_value = feed::DEFAULT_ICAL_BASE)]
    pub ical_base_url: String,

    /// Number of weeks requested from the upstream feed.
    #[arg(long, env = "ICAL_WEEKS", default_value = "8")]
    pub weeks: String,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "edtalert-scheduler", about = "Polls the timetable and publishes event snapshots")]
pub struct SchedulerSettings {
    #[arg(long, env = "CONFIG_URL", default_value = "http://localhost:8080")]
    pub config_url: String,

    #[arg(long, env = "TIMETABLE_URL", default_value = "http://localhost:8081")]
    pub timetable_url: String,

    #[arg(long, env = "NATS_URL", default_value = "nats://127.0.0.1:4222")]
    pub nats_url: String,

    /// Tick period ("10m", "1h", ...).
    #[arg(long, env = "SCHEDULER_PERIOD", default_value = "10m", value_parser = humantime::parse_duration)]
    pub period: Duration,

    /// Run a single tick and exit.
    #[arg(long)]
    pub once: bool,

    /// Optional fetch window start (YYYY-MM-DD, inclusive).
    #[arg(long, env = "SCHEDULER_FROM")]
    pub from: Option<String>,

    /// Optional fetch window end (YYYY-MM-DD, inclusive).
    #[arg(long, env = "SCHEDULER_TO")]
    pub to: Option<String>,
}

impl SchedulerSettings {
    /// `--once`, or RUN_ONCE set to anything non-empty.
    pub fn run_once(&self) -> bool {
        self.once
            || std::env::var("RUN_ONCE")
                .map(|v| !v.is_empty())
                .unwrap_or(false)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "edtalert-consumer", about = "Diffs event snapshots and publishes alerts")]
pub struct ConsumerSettings {
    #[arg(long, env = "NATS_URL", default_value = "nats://127.0.0.1:4222")]
    pub nats_url: String,

    #[arg(long, env = "DB_PATH", default_value = "events.db")]
    pub db_path: String,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "edtalert-alerter", about = "Matches alerts to subscriptions and sends mail")]
pub struct AlerterSettings {
    #[arg(long, env = "NATS_URL", default_value = "nats://127.0.0.1:4222")]
    pub nats_url: String,

    #[arg(long, env = "CONFIG_URL", default_value = "http://localhost:8080")]
    pub config_url: String,

    #[arg(long, env = "MAIL_API_URL", default_value = "https://mail-api.edu.forestier.re")]
    pub mail_api_url: String,

    #[arg(long, env = "MAIL_TOKEN", default_value = "")]
    pub mail_token: String,

    /// Set to "1" to log every outgoing mail payload.
    #[arg(long, env = "ALERTER_DEBUG")]
    pub alerter_debug: Option<String>,
}

impl AlerterSettings {
    pub fn debug_payload(&self) -> bool {
        self.alerter_debug.as_deref() == Some("1")
    }
}
