//! Append-only SQLite audit log of filtered records

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::Result;
use crate::filter::MarketRecord;

/// One persisted audit row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub run_id: String,
    pub pair: String,
    pub price_usd: f64,
    pub volume_usd: f64,
    pub change_pct: f64,
    pub token_address: String,
    pub recorded_at: String,
}

/// Audit store. Every record that survives a run's filters lands here
/// with the run id; rows are only ever appended.
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    /// Opens the database file, creating it and the schema on first
    /// use.
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::init(pool).await
    }

    /// In-memory store. A single connection keeps the shared schema
    /// alive for the pool's lifetime.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                run_id TEXT NOT NULL,
                pair TEXT NOT NULL,
                price_usd REAL NOT NULL,
                volume_usd REAL NOT NULL,
                change_pct REAL NOT NULL,
                token_address TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// Appends one row per record under the given run id. Returns the
    /// number of rows written.
    pub async fn append_all(&self, run_id: &str, records: &[MarketRecord]) -> Result<usize> {
        let recorded_at = Utc::now().to_rfc3339();
        for record in records {
            sqlx::query(
                r#"
                INSERT INTO records
                    (run_id, pair, price_usd, volume_usd, change_pct, token_address, recorded_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(run_id)
            .bind(&record.pair)
            .bind(record.price_usd)
            .bind(record.volume_usd)
            .bind(record.change_pct)
            .bind(&record.token_address)
            .bind(&recorded_at)
            .execute(&self.pool)
            .await?;
        }

        debug!(run_id, appended = records.len(), "audit rows appended");
        Ok(records.len())
    }

    /// Newest rows first, up to `limit`.
    pub async fn recent(&self, limit: i64) -> Result<Vec<StoredRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT run_id, pair, price_usd, volume_usd, change_pct, token_address, recorded_at
            FROM records ORDER BY id DESC LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(StoredRecord {
                run_id: row.get("run_id"),
                pair: row.get("pair"),
                price_usd: row.get("price_usd"),
                volume_usd: row.get("volume_usd"),
                change_pct: row.get("change_pct"),
                token_address: row.get("token_address"),
                recorded_at: row.get("recorded_at"),
            });
        }
        Ok(records)
    }

    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM records")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn record(pair: &str, price: f64) -> MarketRecord {
        MarketRecord {
            pair: pair.to_string(),
            price_usd: price,
            volume_usd: 50_000.0,
            change_pct: 10.0,
            token_address: "0xabc".to_string(),
            creator: None,
        }
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let written = store
            .append_all("run-1", &[record("FOO/ETH", 0.05), record("BAR/ETH", 1.0)])
            .await
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(store.count().await.unwrap(), 2);

        let rows = store.recent(10).await.unwrap();
        assert_eq!(rows.len(), 2);
        // newest insert comes back first
        assert_eq!(rows[0].pair, "BAR/ETH");
        assert_eq!(rows[1].pair, "FOO/ETH");
        assert_eq!(rows[0].run_id, "run-1");
        assert!(DateTime::parse_from_rfc3339(&rows[0].recorded_at).is_ok());
    }

    #[tokio::test]
    async fn test_recent_respects_limit() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let batch: Vec<MarketRecord> =
            (0..5).map(|i| record(&format!("T{i}/ETH"), 1.0)).collect();
        store.append_all("run-1", &batch).await.unwrap();

        let rows = store.recent(3).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].pair, "T4/ETH");
    }

    #[tokio::test]
    async fn test_empty_batch_writes_nothing() {
        let store = RecordStore::open_in_memory().await.unwrap();
        assert_eq!(store.append_all("run-1", &[]).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rows_accumulate_across_runs() {
        let store = RecordStore::open_in_memory().await.unwrap();
        store.append_all("run-1", &[record("A/ETH", 1.0)]).await.unwrap();
        store.append_all("run-2", &[record("B/ETH", 1.0)]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        let rows = store.recent(10).await.unwrap();
        assert_eq!(rows[0].run_id, "run-2");
        assert_eq!(rows[1].run_id, "run-1");
    }

    #[tokio::test]
    async fn test_open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.db");

        let store = RecordStore::open(path.to_str().unwrap()).await.unwrap();
        store.append_all("run-1", &[record("A/ETH", 1.0)]).await.unwrap();
        assert!(path.exists());
    }
}
