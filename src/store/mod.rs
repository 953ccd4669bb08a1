//! Append-only log of computed energy results.
//!
//! Backends serialize appends and only ever expose fully written rows, so a
//! `recent` read is always a consistent snapshot.

use crate::estimation::model::EnergyResult;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryResultStore;
pub use sqlite::SqliteResultStore;

pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationRecord {
    pub id: RecordId,
    pub daily_energy: f64,
    pub yearly_energy: f64,
    /// RFC 3339, UTC.
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("timestamp format error: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("result store lock poisoned")]
    Lock,
}

#[async_trait]
pub trait ResultStore: Send + Sync + std::fmt::Debug {
    /// Persists one result and returns its store-assigned id.
    async fn append(&self, result: &EnergyResult) -> Result<RecordId, StoreError>;

    /// At most `limit` records, most recent first.
    async fn recent(&self, limit: u32) -> Result<Vec<CalculationRecord>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}

pub(crate) fn now_rfc3339() -> Result<String, StoreError> {
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}
