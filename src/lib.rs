// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Library core for the EDT alert pipeline.
//!
//! Four cooperating processes share this crate: the timetable feed
//! surface, the scheduler (poller/publisher), the consumer (diff engine)
//! and the alerter (subscription matcher). They exchange data only over
//! the durable bus and the event store.

// --- Modules ---
pub mod alerter;
pub mod bus;
pub mod clients;
pub mod config;
pub mod consumer;
pub mod feed;
pub mod ical;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod shutdown;
pub mod store;

// Re-export key types for convenience
pub mod prelude {
    pub use crate::bus::{AlertSink, Bus, BusError, EventSink, MessageHandler, Publisher};
    pub use crate::clients::{
        ClientError, ConfigApi, ConfigClient, MailClient, MailSender, OutgoingMail, TimetableApi,
        TimetableClient,
    };
    pub use crate::models::{
        Agenda, AlertMessage, AlertType, Change, ChangeField, ChangeKind, Event, Subscription,
    };
    pub use crate::store::{SnapshotStore, SqliteStore, StoreError};

    // Common Libs
    pub use log::{debug, error, info, warn};
    pub use std::sync::Arc;
}
