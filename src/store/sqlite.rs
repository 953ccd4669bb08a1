use crate::estimation::model::EnergyResult;
use crate::store::{CalculationRecord, RecordId, ResultStore, StoreError, now_rfc3339};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub const CALCULATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS calculations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    daily_energy REAL NOT NULL,
    yearly_energy REAL NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQLite-backed result log.
///
/// The pool holds a single connection: appends are serialized by SQLite and
/// every read sees only committed rows.
#[derive(Debug, Clone)]
pub struct SqliteResultStore {
    pool: SqlitePool,
}

impl SqliteResultStore {
    /// Opens (creating if needed) the database at `url` and ensures the
    /// schema exists.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        if let Some(parent) = options.get_filename().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            // An in-memory database lives only as long as its connection.
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        sqlx::query(CALCULATIONS_TABLE).execute(&pool).await?;
        info!(url = url, "Result store opened");

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    async fn append(&self, result: &EnergyResult) -> Result<RecordId, StoreError> {
        let created_at = now_rfc3339()?;
        let outcome = sqlx::query(
            "INSERT INTO calculations (daily_energy, yearly_energy, created_at) VALUES (?, ?, ?)",
        )
        .bind(result.daily_energy_kwh)
        .bind(result.yearly_energy_kwh)
        .bind(created_at)
        .execute(&self.pool)
        .await?;
        Ok(outcome.last_insert_rowid())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<CalculationRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, f64, f64, String)>(
            r#"
            SELECT id, daily_energy, yearly_energy, created_at
            FROM calculations
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, daily_energy, yearly_energy, created_at)| CalculationRecord {
                    id,
                    daily_energy,
                    yearly_energy,
                    created_at,
                },
            )
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
