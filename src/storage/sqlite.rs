use crate::model::{Listing, StorageError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Bookkeeping row for one finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub airs: usize,
    pub pros: usize,
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and creates the tables if needed.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS listings (
                url TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                variant TEXT NOT NULL,
                year TEXT NOT NULL DEFAULT '',
                ram TEXT NOT NULL DEFAULT '',
                storage TEXT NOT NULL DEFAULT '',
                touchbar TEXT NOT NULL DEFAULT '',
                m1 INTEGER NOT NULL,
                cpu_ghz TEXT NOT NULL DEFAULT '',
                views INTEGER,
                price INTEGER,
                fetched_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                finished_at TEXT NOT NULL,
                total INTEGER NOT NULL,
                airs INTEGER NOT NULL,
                pros INTEGER NOT NULL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Inserts or updates a listing. Returns true if the URL was not stored yet.
    pub fn save_listing(&self, listing: &Listing) -> Result<bool, StorageError> {
        let known = self
            .conn
            .query_row("SELECT 1 FROM listings WHERE url = ?1", params![listing.url()], |_| Ok(()))
            .optional()?
            .is_some();

        let attrs = &listing.attributes;
        self.conn.execute(
            "INSERT OR REPLACE INTO listings (
                url, date, variant, year, ram, storage,
                touchbar, m1, cpu_ghz, views, price, fetched_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                &attrs.url,
                &attrs.date,
                attrs.variant.as_str(),
                attrs.year.to_string(),
                attrs.ram.to_string(),
                attrs.storage.to_string(),
                attrs.touchbar.to_string(),
                attrs.m1_chip,
                attrs.cpu_ghz.to_string(),
                listing.metadata.views.map(|v| v as i64),
                listing.metadata.price.map(|p| p as i64),
                listing.fetched_at.to_rfc3339(),
            ],
        )?;

        Ok(!known)
    }

    /// Deletes listings whose URL was not seen in the current run.
    pub fn delete_missing_listings(&self, current_urls: &[String]) -> Result<usize, StorageError> {
        if current_urls.is_empty() {
            return Ok(self.conn.execute("DELETE FROM listings", [])?);
        }

        let placeholders = current_urls.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!("DELETE FROM listings WHERE url NOT IN ({})", placeholders);
        let mut stmt = self.conn.prepare(&sql)?;
        Ok(stmt.execute(rusqlite::params_from_iter(current_urls))?)
    }

    pub fn count_listings(&self) -> Result<usize, StorageError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn record_run(&self, run: &RunRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO runs (finished_at, total, airs, pros) VALUES (?1, ?2, ?3, ?4)",
            params![
                run.finished_at.to_rfc3339(),
                run.total as i64,
                run.airs as i64,
                run.pros as i64,
            ],
        )?;
        Ok(())
    }

    /// The most recently recorded run, if any.
    pub fn last_run(&self) -> Result<Option<RunRecord>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT finished_at, total, airs, pros FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    let finished_at: String = row.get(0)?;
                    let finished_at = DateTime::parse_from_rfc3339(&finished_at)
                        .map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
                        })?
                        .with_timezone(&Utc);
                    Ok(RunRecord {
                        finished_at,
                        total: row.get::<_, i64>(1)? as usize,
                        airs: row.get::<_, i64>(2)? as usize,
                        pros: row.get::<_, i64>(3)? as usize,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}
