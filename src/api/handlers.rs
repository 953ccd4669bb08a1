use crate::api::pages;
use crate::api::responses::{
    CalculationErrorCode, CalculationErrorResponse, CalculationSuccessResponse, HealthStatus,
    HealthSuccessResponse, ResultsErrorCode, ResultsErrorResponse, ResultsSuccessResponse,
};
use crate::calculation::{CalculationOutcome, calculate_and_record};
use crate::error::CalculationError;
use crate::estimation::model::EstimationError;
use crate::intake::{self, InputError, RawFields};
use crate::state::AppState;
use crate::store::CalculationRecord;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
enum TimestampError {
    Format(time::error::Format),
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::Format(err) => write!(f, "timestamp format error: {err}"),
        }
    }
}

fn format_timestamp(timestamp: SystemTime) -> Result<String, TimestampError> {
    let datetime = OffsetDateTime::from(timestamp);
    datetime.format(&Rfc3339).map_err(TimestampError::Format)
}

fn now_timestamp(context: &str) -> String {
    format_timestamp(SystemTime::now()).unwrap_or_else(|err| {
        error!(error = %err, context = context, "Failed to format response timestamp");
        "1970-01-01T00:00:00Z".to_string()
    })
}

// HTML pages

pub async fn get_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    build_index_page(&state).await
}

async fn build_index_page(state: &AppState) -> (StatusCode, Html<String>) {
    let recent = recent_or_empty(state, "/").await;
    (StatusCode::OK, Html(pages::index_page(&recent, None)))
}

/// History shown next to the form; a failing store renders an empty table.
async fn recent_or_empty(state: &AppState, route: &str) -> Vec<CalculationRecord> {
    state
        .store()
        .recent(state.recent_limit())
        .await
        .unwrap_or_else(|err| {
            error!(error = %err, route = route, "Failed to read recent results for page");
            Vec::new()
        })
}

pub async fn post_calculate(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<RawFields>,
) -> impl IntoResponse {
    build_calculate_page(&state, &fields).await
}

async fn build_calculate_page(state: &AppState, fields: &RawFields) -> (StatusCode, Html<String>) {
    match calculate_and_record(state, fields).await {
        Ok(outcome) => (StatusCode::OK, Html(pages::result_page(&outcome))),
        Err(CalculationError::Store(err)) => {
            error!(error = %err, "Result store failure while handling /calculate");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::error_page(INTERNAL_ERROR_MESSAGE)),
            )
        }
        Err(err) => {
            let recent = recent_or_empty(state, "/calculate").await;
            (
                calculation_error_status(&err),
                Html(pages::index_page(&recent, Some(&err.to_string()))),
            )
        }
    }
}

// JSON API

pub enum CalculationResponse {
    Success(CalculationSuccessResponse),
    Error {
        status: StatusCode,
        body: CalculationErrorResponse,
    },
}

impl IntoResponse for CalculationResponse {
    fn into_response(self) -> Response {
        match self {
            CalculationResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            CalculationResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn post_api_calculate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Map<String, serde_json::Value>>,
) -> impl IntoResponse {
    build_calculation_response(&state, &body, SystemTime::now()).await
}

async fn build_calculation_response(
    state: &AppState,
    body: &serde_json::Map<String, serde_json::Value>,
    now: SystemTime,
) -> CalculationResponse {
    calculation_response_stamped(state, body, format_timestamp(now)).await
}

/// Nothing is recorded unless the response timestamp is already available.
async fn calculation_response_stamped(
    state: &AppState,
    body: &serde_json::Map<String, serde_json::Value>,
    timestamp: Result<String, TimestampError>,
) -> CalculationResponse {
    let timestamp = match timestamp {
        Ok(formatted) => formatted,
        Err(_) => return calculation_internal_error("timestamp formatting failure"),
    };

    let outcome = match intake::fields_from_json(body) {
        Ok(fields) => calculate_and_record(state, &fields).await,
        Err(err) => Err(CalculationError::Input(err)),
    };

    match outcome {
        Ok(outcome) => CalculationResponse::Success(success_body(outcome, timestamp)),
        Err(CalculationError::Store(err)) => {
            calculation_internal_error(&format!("result store failure: {err}"))
        }
        Err(err) => CalculationResponse::Error {
            status: calculation_error_status(&err),
            body: CalculationErrorResponse {
                error_code: calculation_error_code(&err),
                error_message: err.to_string(),
                field: calculation_error_field(&err).map(str::to_string),
                timestamp,
            },
        },
    }
}

fn success_body(outcome: CalculationOutcome, timestamp: String) -> CalculationSuccessResponse {
    CalculationSuccessResponse {
        record_id: outcome.record_id,
        daily_energy_kwh: outcome.estimate.result.daily_energy_kwh,
        yearly_energy_kwh: outcome.estimate.result.yearly_energy_kwh,
        trips_per_day: outcome.estimate.breakdown.trips_per_day,
        warnings: outcome
            .estimate
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect(),
        recent: outcome.recent,
        timestamp,
    }
}

fn calculation_error_status(err: &CalculationError) -> StatusCode {
    match err {
        CalculationError::Input(_) => StatusCode::BAD_REQUEST,
        CalculationError::Estimation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CalculationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn calculation_error_code(err: &CalculationError) -> CalculationErrorCode {
    match err {
        CalculationError::Input(InputError::MissingField { .. }) => {
            CalculationErrorCode::MissingField
        }
        CalculationError::Input(InputError::InvalidValue { .. }) => {
            CalculationErrorCode::InvalidValue
        }
        CalculationError::Estimation(EstimationError::DegenerateGeometry { .. }) => {
            CalculationErrorCode::DegenerateGeometry
        }
        CalculationError::Estimation(EstimationError::NonFinite { .. }) => {
            CalculationErrorCode::InvalidResult
        }
        CalculationError::Store(_) => CalculationErrorCode::InternalError,
    }
}

fn calculation_error_field(err: &CalculationError) -> Option<&'static str> {
    match err {
        CalculationError::Input(input) => Some(input.field()),
        CalculationError::Estimation(EstimationError::DegenerateGeometry { .. }) => Some("ssc"),
        _ => None,
    }
}

fn calculation_internal_error(message: &str) -> CalculationResponse {
    error!(
        message = message,
        "Internal error while handling /api/calculate"
    );
    CalculationResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: CalculationErrorResponse {
            error_code: CalculationErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            field: None,
            timestamp: now_timestamp("/api/calculate"),
        },
    }
}

pub enum ResultsResponse {
    Success(ResultsSuccessResponse),
    Error {
        status: StatusCode,
        body: ResultsErrorResponse,
    },
}

impl IntoResponse for ResultsResponse {
    fn into_response(self) -> Response {
        match self {
            ResultsResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            ResultsResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_results(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    build_results_response(&state, SystemTime::now()).await
}

async fn build_results_response(state: &AppState, now: SystemTime) -> ResultsResponse {
    let results = match state.store().recent(state.recent_limit()).await {
        Ok(results) => results,
        Err(err) => return results_internal_error(&format!("result store failure: {err}")),
    };

    match format_timestamp(now) {
        Ok(timestamp) => ResultsResponse::Success(ResultsSuccessResponse { results, timestamp }),
        Err(_) => results_internal_error("timestamp formatting failure"),
    }
}

fn results_internal_error(message: &str) -> ResultsResponse {
    error!(message = message, "Internal error while handling /api/results");
    ResultsResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ResultsErrorResponse {
            error_code: ResultsErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: now_timestamp("/api/results"),
        },
    }
}

pub async fn get_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, body) = build_health_response(&state, SystemTime::now()).await;
    (status, Json(body))
}

async fn build_health_response(
    state: &AppState,
    now: SystemTime,
) -> (StatusCode, HealthSuccessResponse) {
    let status = match state.store().ping().await {
        Ok(()) => HealthStatus::Ok,
        Err(err) => {
            error!(error = %err, "Result store health check failed");
            HealthStatus::Ko
        }
    };

    let status_code = match status {
        HealthStatus::Ok => StatusCode::OK,
        HealthStatus::Ko => StatusCode::SERVICE_UNAVAILABLE,
    };

    let timestamp = format_timestamp(now).unwrap_or_else(|_| now_timestamp("/api/health"));

    (
        status_code,
        HealthSuccessResponse {
            status,
            model: state.model().name().to_string(),
            store: state.store().backend().to_string(),
            timestamp,
        },
    )
}
