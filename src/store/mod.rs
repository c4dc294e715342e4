// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Durable store of the last-seen snapshot per event UID.
//!
//! One sqlite table keyed by `id`; `upsert` replaces every field in a
//! single statement so a concurrent reader never observes a torn row.

use async_trait::async_trait;
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

use crate::models::Event;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Point lookup and replace-all upsert over event snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Event>, StoreError>;
    async fn upsert(&self, event: &Event) -> Result<(), StoreError>;
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS events (
  id TEXT PRIMARY KEY,
  title TEXT,
  description TEXT,
  start TEXT,
  "end" TEXT,
  location TEXT,
  last_update TEXT,
  agenda_ids TEXT  -- JSON array
);
"#;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `path` and migrates the
    /// schema.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.migrate().await?;
        info!("[store] opened event store at {}", path);
        Ok(store)
    }

    /// In-memory database, used by tests.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn get(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query(
            r#"SELECT id, title, description, start, "end", location, last_update, agenda_ids
               FROM events WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let agenda_json: String = row.try_get("agenda_ids")?;
        let agenda_ids = if agenda_json.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&agenda_json)?
        };

        Ok(Some(Event {
            id: row.try_get("id")?,
            agenda_ids,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            start: row.try_get("start")?,
            end: row.try_get("end")?,
            location: row.try_get("location")?,
            last_update: row.try_get("last_update")?,
        }))
    }

    async fn upsert(&self, event: &Event) -> Result<(), StoreError> {
        let agenda_json = serde_json::to_string(&event.agenda_ids)?;
        sqlx::query(
            r#"INSERT INTO events (id, title, description, start, "end", location, last_update, agenda_ids)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 description = excluded.description,
                 start = excluded.start,
                 "end" = excluded."end",
                 location = excluded.location,
                 last_update = excluded.last_update,
                 agenda_ids = excluded.agenda_ids"#,
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.start)
        .bind(&event.end)
        .bind(&event.location)
        .bind(&event.last_update)
        .bind(agenda_json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Event {
        Event {
            id: "U1".into(),
            agenda_ids: vec!["13295".into(), "13345".into()],
            title: "Math".into(),
            description: "Groupe 1".into(),
            start: "2025-11-10T08:00:00Z".into(),
            end: "2025-11-10T10:00:00Z".into(),
            location: "A1".into(),
            last_update: "2025-11-09T15:30:00Z".into(),
        }
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_then_get_round_trips() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let ev = sample();
        store.upsert(&ev).await.unwrap();
        let back = store.get("U1").await.unwrap().unwrap();
        assert_eq!(back, ev);
    }

    #[tokio::test]
    async fn test_upsert_replaces_all_fields() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.upsert(&sample()).await.unwrap();

        let mut updated = sample();
        updated.location = "B2".into();
        updated.agenda_ids = vec!["99".into()];
        store.upsert(&updated).await.unwrap();

        let back = store.get("U1").await.unwrap().unwrap();
        assert_eq!(back.location, "B2");
        assert_eq!(back.agenda_ids, vec!["99".to_string()]);
        assert_eq!(back.title, "Math");
    }
}
