// History Store
// Append-only SQLite log of analysis outcomes

use crate::models::HistoryRecord;
use sha2::{Digest, Sha256};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to create history directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("History database error: {0}")]
    Database(#[from] sqlx::Error),
}

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS history (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp   REAL,
        text_hash   TEXT,
        prediction  TEXT,
        confidence  REAL,
        n_words     INTEGER
    )
"#;

/// SHA-256 hex digest of the UTF-8 text
pub fn hash_text(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

fn unix_seconds_now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Open (creating if needed) the database file at `path`
    pub async fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| HistoryError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "history.opened");
        Self::init(pool).await
    }

    /// Private in-memory database; lives as long as the store
    pub async fn open_in_memory() -> Result<Self, HistoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self, HistoryError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Store one result; returns the new row id
    pub async fn log_result(
        &self,
        text: &str,
        prediction: &str,
        confidence: f64,
        n_words: usize,
    ) -> Result<i64, HistoryError> {
        let text_hash = hash_text(text);
        let result = sqlx::query(
            "INSERT INTO history (timestamp, text_hash, prediction, confidence, n_words) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(unix_seconds_now())
        .bind(text_hash)
        .bind(prediction)
        .bind(confidence)
        .bind(n_words as i64)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(id, prediction, confidence, n_words, "history.logged");
        Ok(id)
    }

    /// All rows, newest first
    pub async fn fetch_all(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let rows = sqlx::query(
            "SELECT id, timestamp, text_hash, prediction, confidence, n_words FROM history ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(HistoryRecord {
                    id: row.try_get("id")?,
                    timestamp: row.try_get("timestamp")?,
                    text_hash: row.try_get("text_hash")?,
                    prediction: row.try_get("prediction")?,
                    confidence: row.try_get("confidence")?,
                    n_words: row.try_get("n_words")?,
                })
            })
            .collect()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
