//! Energy model trait and the records flowing through it.
//!
//! The model is selected via the `[estimation]` section of `config.toml` and
//! built at startup by [`create_model`](super::create_model).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevatorType {
    Hydraulic,
    Traction,
    #[default]
    Other,
}

impl ElevatorType {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "hydraulic" => ElevatorType::Hydraulic,
            "traction" => ElevatorType::Traction,
            _ => ElevatorType::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpressZone {
    Absent,
    Present {
        /// Length of the travel segment without intermediate stops.
        length_m: f64,
        /// Height of the lowest floor served above the express zone.
        lowest_floor_m: f64,
    },
}

/// Physical and operational description of one elevator installation.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevatorParameters {
    /// `0.0` means unknown: derived from `usage_category`.
    pub trips_per_day: f64,
    pub usage_category: Option<u32>,
    pub stops: u32,
    pub elevator_type: ElevatorType,
    /// Percentage of rated load offset by the counterweight.
    pub counterbalance_ratio: u32,
    pub rated_load_kg: f64,
    pub travel_distance_m: f64,
    pub short_floor_distance_m: f64,
    pub express_zone: ExpressZone,
    pub rated_energy_full_trip: f64,
    pub rated_energy_short_trip: f64,
    pub rated_speed: f64,
    pub rated_acceleration: f64,
    pub rated_jerk: f64,
    pub door_cycle_time: f64,
    pub idle_power: f64,
    pub standby5_power: f64,
    pub standby30_power: f64,
    pub operating_days_per_year: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyResult {
    pub daily_energy_kwh: f64,
    pub yearly_energy_kwh: f64,
}

/// Every intermediate quantity of one estimate, in formula order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub trips_per_day: f64,
    pub idle_fraction: f64,
    pub standby5_fraction: f64,
    pub standby30_fraction: f64,
    pub stop_factor: f64,
    pub load_factor: f64,
    pub counterbalance_factor: f64,
    pub average_travel_distance_m: f64,
    pub energy_per_metre: f64,
    pub short_trip_offset: f64,
    pub average_trip_energy: f64,
    pub running_energy_per_day: f64,
    pub average_trip_time_s: f64,
    pub running_hours_per_day: f64,
    pub non_running_hours_per_day: f64,
    pub non_running_energy_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub result: EnergyResult,
    pub breakdown: Breakdown,
    pub warnings: Vec<EstimationWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupTable {
    UsageCategory,
    StopFactor,
    CounterbalanceFactor,
    ExpressZoneFactor,
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupTable::UsageCategory => "usage category",
            LookupTable::StopFactor => "stop factor",
            LookupTable::CounterbalanceFactor => "counterbalance factor",
            LookupTable::ExpressZoneFactor => "express zone factor",
        };
        f.write_str(name)
    }
}

/// Non-fatal conditions observed while estimating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimationWarning {
    LookupDefaulted {
        table: LookupTable,
        key: String,
        default: f64,
    },
    NegativeNonRunningTime {
        hours: f64,
    },
}

impl fmt::Display for EstimationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationWarning::LookupDefaulted {
                table,
                key,
                default,
            } => write!(f, "no {table} entry for {key}, using {default}"),
            EstimationWarning::NegativeNonRunningTime { hours } => write!(
                f,
                "trip count and trip time exceed a day, non-running time is {hours:.2} h"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    #[error("travel distance equals short trip distance ({distance_m} m)")]
    DegenerateGeometry { distance_m: f64 },
    #[error("{quantity} is not a finite number")]
    NonFinite { quantity: &'static str },
}

/// Trait for models turning elevator parameters into an energy estimate.
pub trait EnergyModel: Send + Sync + fmt::Debug {
    fn estimate(&self, params: &ElevatorParameters) -> Result<Estimate, EstimationError>;

    /// Identifier reported in logs and health output.
    fn name(&self) -> &'static str;
}
