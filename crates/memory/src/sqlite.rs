//! SQLite transcript store.
//!
//! One append-only table, `turns`, indexed by `(user_id, timestamp)`.
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order equals chronological order; the integer rowid breaks
//! ties between turns written in the same instant.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use lifexia_core::error::StoreError;
use lifexia_core::transcript::TranscriptStore;
use lifexia_core::turn::{ChatTurn, Role};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

pub struct SqliteTranscript {
    pool: SqlitePool,
}

impl SqliteTranscript {
    /// Open (or create) the database at `path`.
    ///
    /// Pass `":memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let in_memory = path == ":memory:";
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{path}"))
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(if in_memory { SqliteJournalMode::Memory } else { SqliteJournalMode::Wal })
            .synchronous(SqliteSynchronous::Normal);

        // every connection to ":memory:" is a separate database
        let max_connections = if in_memory { 1 } else { 4 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite transcript store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS turns (
                iid           INTEGER PRIMARY KEY AUTOINCREMENT,
                id            TEXT UNIQUE NOT NULL,
                user_id       TEXT NOT NULL,
                role          TEXT NOT NULL,
                text          TEXT NOT NULL,
                response_text TEXT,
                timestamp     TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("turns table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_turns_user_time ON turns(user_id, timestamp)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("user/time index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_turn(row: &sqlx::sqlite::SqliteRow) -> Result<ChatTurn, StoreError> {
        let column = |name: &str, e: sqlx::Error| StoreError::QueryFailed(format!("{name} column: {e}"));

        let id: String = row.try_get("id").map_err(|e| column("id", e))?;
        let user_id: String = row.try_get("user_id").map_err(|e| column("user_id", e))?;
        let role_str: String = row.try_get("role").map_err(|e| column("role", e))?;
        let text: String = row.try_get("text").map_err(|e| column("text", e))?;
        let response_text: Option<String> =
            row.try_get("response_text").map_err(|e| column("response_text", e))?;
        let timestamp_str: String = row.try_get("timestamp").map_err(|e| column("timestamp", e))?;

        let role = Role::parse(&role_str)
            .ok_or_else(|| StoreError::QueryFailed(format!("unknown role '{role_str}'")))?;

        let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::QueryFailed(format!("timestamp '{timestamp_str}': {e}")))?;

        Ok(ChatTurn {
            id,
            user_id,
            role,
            text,
            response_text,
            timestamp,
        })
    }
}

#[async_trait]
impl TranscriptStore for SqliteTranscript {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn append_turn(&self, turn: &ChatTurn) -> Result<(), StoreError> {
        let timestamp = turn.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            r#"
            INSERT INTO turns (id, user_id, role, text, response_text, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&turn.id)
        .bind(&turn.user_id)
        .bind(turn.role.as_str())
        .bind(&turn.text)
        .bind(&turn.response_text)
        .bind(&timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT failed: {e}")))?;

        debug!(turn_id = %turn.id, user_id = %turn.user_id, "Appended turn");
        Ok(())
    }

    async fn list_turns(&self, user_id: &str, limit: usize) -> Result<Vec<ChatTurn>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM (
                SELECT * FROM turns
                WHERE user_id = ?1
                ORDER BY timestamp DESC, iid DESC
                LIMIT ?2
            )
            ORDER BY timestamp ASC, iid ASC
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("List turns: {e}")))?;

        rows.iter().map(Self::row_to_turn).collect()
    }

    async fn count(&self, user_id: &str) -> Result<usize, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM turns WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("COUNT: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::QueryFailed(format!("cnt column: {e}")))?;

        Ok(cnt as usize)
    }
}
