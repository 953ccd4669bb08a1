use crate::estimation::model::EnergyResult;
use crate::store::{CalculationRecord, RecordId, ResultStore, StoreError, now_rfc3339};
use async_trait::async_trait;
use std::sync::RwLock;

/// Process-local store used when no database URL is configured.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    records: RwLock<Vec<CalculationRecord>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn append(&self, result: &EnergyResult) -> Result<RecordId, StoreError> {
        let created_at = now_rfc3339()?;
        let mut guard = self.records.write().map_err(|_| StoreError::Lock)?;
        let id = guard.last().map_or(1, |r| r.id + 1);
        guard.push(CalculationRecord {
            id,
            daily_energy: result.daily_energy_kwh,
            yearly_energy: result.yearly_energy_kwh,
            created_at,
        });
        Ok(id)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<CalculationRecord>, StoreError> {
        let guard = self.records.read().map_err(|_| StoreError::Lock)?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.records.read().map(|_| ()).map_err(|_| StoreError::Lock)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
