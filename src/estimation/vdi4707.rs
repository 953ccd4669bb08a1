//! VDI 4707 style daily and yearly energy estimate.
//!
//! Running energy follows a linear energy-versus-distance model anchored on
//! the measured full-travel and short-trip energies; non-running energy
//! weighs idle and standby power by the usage category duty cycle.

use crate::estimation::model::{
    Breakdown, EnergyModel, EnergyResult, ElevatorParameters, Estimate, EstimationError,
    EstimationWarning, ExpressZone, LookupTable,
};
use crate::estimation::tables;
use serde::Deserialize;
use tracing::warn;

const HOURS_PER_DAY: f64 = 24.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// How the average travel distance is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// Applies the express zone correction whenever a zone is supplied.
    #[default]
    ExpressZone,
    /// Always `S * travel distance`, ignoring any express zone.
    Simple,
}

#[derive(Debug, Default)]
pub struct Vdi4707Model {
    pub distance_mode: DistanceMode,
}

impl Vdi4707Model {
    pub fn new(distance_mode: DistanceMode) -> Self {
        Self { distance_mode }
    }
}

impl EnergyModel for Vdi4707Model {
    fn estimate(&self, params: &ElevatorParameters) -> Result<Estimate, EstimationError> {
        calculate_energy(params, self.distance_mode)
    }

    fn name(&self) -> &'static str {
        match self.distance_mode {
            DistanceMode::ExpressZone => "vdi4707",
            DistanceMode::Simple => "vdi4707_simple",
        }
    }
}

struct DutyCycle {
    trips_per_day: f64,
    idle_fraction: f64,
    standby5_fraction: f64,
    standby30_fraction: f64,
}

/// Yearly energy is the rounded daily figure times the operating days.
pub fn calculate_energy(
    params: &ElevatorParameters,
    distance_mode: DistanceMode,
) -> Result<Estimate, EstimationError> {
    let rise = params.travel_distance_m - params.short_floor_distance_m;
    if rise == 0.0 {
        return Err(EstimationError::DegenerateGeometry {
            distance_m: params.travel_distance_m,
        });
    }

    let mut warnings = Vec::new();

    let duty = resolve_duty_cycle(params, &mut warnings);

    let stop_factor = tables::stop_factor(params.stops).unwrap_or_else(|| {
        warnings.push(defaulted(
            LookupTable::StopFactor,
            params.stops,
            tables::DEFAULT_STOP_FACTOR,
        ));
        tables::DEFAULT_STOP_FACTOR
    });

    let load_factor = tables::load_factor(params.rated_load_kg);

    let counterbalance_factor =
        tables::counterbalance_factor(params.counterbalance_ratio, load_factor).unwrap_or_else(
            || {
                warnings.push(defaulted(
                    LookupTable::CounterbalanceFactor,
                    params.counterbalance_ratio,
                    tables::DEFAULT_COUNTERBALANCE_FACTOR,
                ));
                tables::DEFAULT_COUNTERBALANCE_FACTOR
            },
        );

    let average_travel_distance_m =
        average_travel_distance(params, stop_factor, distance_mode, &mut warnings);

    let energy_per_metre =
        (params.rated_energy_full_trip - params.rated_energy_short_trip) / (2.0 * rise);
    let short_trip_offset = 0.5
        * (params.rated_energy_full_trip - 2.0 * energy_per_metre * params.travel_distance_m);
    let average_trip_energy =
        2.0 * energy_per_metre * average_travel_distance_m + 2.0 * short_trip_offset;
    let running_energy_per_day = counterbalance_factor * duty.trips_per_day * average_trip_energy;

    let average_trip_time_s = average_travel_distance_m / params.rated_speed
        + params.rated_speed / params.rated_acceleration
        + params.rated_acceleration / params.rated_jerk
        + params.door_cycle_time;
    let running_hours_per_day = duty.trips_per_day * average_trip_time_s / SECONDS_PER_HOUR;
    let non_running_hours_per_day = HOURS_PER_DAY - running_hours_per_day;
    if non_running_hours_per_day < 0.0 {
        warnings.push(EstimationWarning::NegativeNonRunningTime {
            hours: non_running_hours_per_day,
        });
    }
    let non_running_energy_per_day = non_running_hours_per_day / 100.0
        * (params.idle_power * duty.idle_fraction
            + params.standby5_power * duty.standby5_fraction
            + params.standby30_power * duty.standby30_fraction);

    let daily = round2((running_energy_per_day + non_running_energy_per_day) / 1000.0);
    let yearly = round2(daily * f64::from(params.operating_days_per_year));

    ensure_finite("running energy", running_energy_per_day)?;
    ensure_finite("average trip time", average_trip_time_s)?;
    ensure_finite("non-running energy", non_running_energy_per_day)?;
    ensure_finite("yearly energy", yearly)?;

    for warning in &warnings {
        warn!(warning = %warning, "Energy estimate used a fallback");
    }

    Ok(Estimate {
        result: EnergyResult {
            daily_energy_kwh: daily,
            yearly_energy_kwh: yearly,
        },
        breakdown: Breakdown {
            trips_per_day: duty.trips_per_day,
            idle_fraction: duty.idle_fraction,
            standby5_fraction: duty.standby5_fraction,
            standby30_fraction: duty.standby30_fraction,
            stop_factor,
            load_factor,
            counterbalance_factor,
            average_travel_distance_m,
            energy_per_metre,
            short_trip_offset,
            average_trip_energy,
            running_energy_per_day,
            average_trip_time_s,
            running_hours_per_day,
            non_running_hours_per_day,
            non_running_energy_per_day,
        },
        warnings,
    })
}

fn resolve_duty_cycle(
    params: &ElevatorParameters,
    warnings: &mut Vec<EstimationWarning>,
) -> DutyCycle {
    if params.trips_per_day == 0.0 {
        let profile = params
            .usage_category
            .and_then(tables::usage_category)
            .unwrap_or_else(|| {
                let key = params
                    .usage_category
                    .map_or_else(|| "none".to_string(), |c| c.to_string());
                warnings.push(EstimationWarning::LookupDefaulted {
                    table: LookupTable::UsageCategory,
                    key,
                    default: f64::from(tables::FALLBACK_USAGE_CATEGORY),
                });
                &tables::USAGE_CATEGORIES[usize::from(tables::FALLBACK_USAGE_CATEGORY) - 1]
            });
        DutyCycle {
            trips_per_day: profile.default_trips_per_day,
            idle_fraction: profile.idle_fraction,
            standby5_fraction: profile.standby5_fraction,
            standby30_fraction: profile.standby30_fraction,
        }
    } else {
        let profile = tables::nearest_usage_category(params.trips_per_day);
        DutyCycle {
            trips_per_day: params.trips_per_day,
            idle_fraction: profile.idle_fraction,
            standby5_fraction: profile.standby5_fraction,
            standby30_fraction: profile.standby30_fraction,
        }
    }
}

fn average_travel_distance(
    params: &ElevatorParameters,
    stop_factor: f64,
    distance_mode: DistanceMode,
    warnings: &mut Vec<EstimationWarning>,
) -> f64 {
    match (distance_mode, params.express_zone) {
        (DistanceMode::Simple, _) | (DistanceMode::ExpressZone, ExpressZone::Absent) => {
            stop_factor * params.travel_distance_m
        }
        (
            DistanceMode::ExpressZone,
            ExpressZone::Present {
                length_m,
                lowest_floor_m,
            },
        ) => {
            let zone_factor = tables::express_zone_factor(length_m).unwrap_or_else(|| {
                warnings.push(defaulted(
                    LookupTable::ExpressZoneFactor,
                    length_m,
                    tables::DEFAULT_EXPRESS_ZONE_FACTOR,
                ));
                tables::DEFAULT_EXPRESS_ZONE_FACTOR
            });
            let express = length_m - lowest_floor_m;
            stop_factor * (params.travel_distance_m - express) + zone_factor * express
        }
    }
}

fn defaulted(table: LookupTable, key: impl ToString, default: f64) -> EstimationWarning {
    EstimationWarning::LookupDefaulted {
        table,
        key: key.to_string(),
        default,
    }
}

fn ensure_finite(quantity: &'static str, value: f64) -> Result<(), EstimationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EstimationError::NonFinite { quantity })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
