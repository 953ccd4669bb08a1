//! One request's pipeline: intake, estimate, record, then read history.

use crate::error::CalculationError;
use crate::estimation::model::Estimate;
use crate::intake::{self, RawFields};
use crate::state::AppState;
use crate::store::{CalculationRecord, RecordId};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct CalculationOutcome {
    pub record_id: RecordId,
    pub estimate: Estimate,
    /// Most recent first, including the record just written.
    pub recent: Vec<CalculationRecord>,
}

pub async fn calculate_and_record(
    state: &AppState,
    raw: &RawFields,
) -> Result<CalculationOutcome, CalculationError> {
    let params = intake::parse(raw).inspect_err(|err| {
        warn!(error = %err, field = err.field(), "Rejected calculation request");
    })?;

    let estimate = state.model().estimate(&params).inspect_err(|err| {
        warn!(error = %err, model = state.model().name(), "Energy estimate failed");
    })?;

    let record_id = state.store().append(&estimate.result).await?;
    info!(
        record_id,
        daily_kwh = estimate.result.daily_energy_kwh,
        yearly_kwh = estimate.result.yearly_energy_kwh,
        warnings = estimate.warnings.len(),
        "Energy estimate recorded"
    );

    let recent = state.store().recent(state.recent_limit()).await?;

    Ok(CalculationOutcome {
        record_id,
        estimate,
        recent,
    })
}
