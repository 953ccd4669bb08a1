//! Request intake: coerces raw form or JSON fields into [`ElevatorParameters`].

use crate::estimation::model::{ElevatorParameters, ElevatorType, ExpressZone};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

pub type RawFields = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("field `{field}` has invalid value `{value}`")]
    InvalidValue { field: &'static str, value: String },
}

impl InputError {
    pub fn field(&self) -> &'static str {
        match self {
            InputError::MissingField { field } | InputError::InvalidValue { field, .. } => field,
        }
    }
}

const EXPRESS_ZONE_PRESENT: u8 = 1;
const EXPRESS_ZONE_ABSENT: u8 = 2;

pub fn parse(raw: &RawFields) -> Result<ElevatorParameters, InputError> {
    let fields = Fields(raw);

    let trips_per_day: f64 = fields.required("trips")?;
    if trips_per_day < 0.0 {
        return Err(fields.invalid("trips"));
    }
    let usage_category = if trips_per_day == 0.0 {
        Some(fields.required("usage_category")?)
    } else {
        fields.optional("usage_category")?
    };

    let express_zone = match fields.optional::<u8>("xpzone")? {
        None | Some(EXPRESS_ZONE_ABSENT) => ExpressZone::Absent,
        Some(EXPRESS_ZONE_PRESENT) => ExpressZone::Present {
            length_m: fields.required("sez")?,
            lowest_floor_m: fields.required("sfl")?,
        },
        Some(_) => return Err(fields.invalid("xpzone")),
    };

    Ok(ElevatorParameters {
        trips_per_day,
        usage_category,
        stops: fields.required("stops")?,
        elevator_type: ElevatorType::from_label(fields.text("type")?),
        counterbalance_ratio: fields.required("counterbalance")?,
        rated_load_kg: fields.required("load")?,
        travel_distance_m: fields.required("src")?,
        short_floor_distance_m: fields.required("ssc")?,
        express_zone,
        rated_energy_full_trip: fields.required("energy_ref")?,
        rated_energy_short_trip: fields.required("energy_short")?,
        rated_speed: fields.required("speed")?,
        rated_acceleration: fields.required("acceleration")?,
        rated_jerk: fields.required("jerk")?,
        door_cycle_time: fields.required("door_time")?,
        idle_power: fields.required("idle_power")?,
        standby5_power: fields.required("standby5")?,
        standby30_power: fields.required("standby30")?,
        operating_days_per_year: fields.required("operating_days")?,
    })
}

/// Flattens a JSON object into [`RawFields`] so JSON and form bodies share
/// one coercion path.
pub fn fields_from_json(body: &serde_json::Map<String, Value>) -> Result<RawFields, InputError> {
    let mut raw = RawFields::with_capacity(body.len());
    for (key, value) in body {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Null => continue,
            other => {
                return Err(InputError::InvalidValue {
                    field: known_field(key).unwrap_or("body"),
                    value: other.to_string(),
                });
            }
        };
        raw.insert(key.clone(), text);
    }
    Ok(raw)
}

const KNOWN_FIELDS: [&str; 21] = [
    "trips",
    "usage_category",
    "stops",
    "type",
    "counterbalance",
    "load",
    "src",
    "ssc",
    "xpzone",
    "sez",
    "sfl",
    "energy_ref",
    "energy_short",
    "speed",
    "acceleration",
    "jerk",
    "door_time",
    "idle_power",
    "standby5",
    "standby30",
    "operating_days",
];

fn known_field(key: &str) -> Option<&'static str> {
    KNOWN_FIELDS.iter().copied().find(|f| *f == key)
}

struct Fields<'a>(&'a RawFields);

impl Fields<'_> {
    fn text(&self, field: &'static str) -> Result<&str, InputError> {
        match self.0.get(field).map(|v| v.trim()) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(InputError::MissingField { field }),
        }
    }

    fn required<T: Numeric>(&self, field: &'static str) -> Result<T, InputError> {
        let value = self.text(field)?;
        T::coerce(value).ok_or_else(|| InputError::InvalidValue {
            field,
            value: value.to_string(),
        })
    }

    fn optional<T: Numeric>(&self, field: &'static str) -> Result<Option<T>, InputError> {
        match self.required(field) {
            Ok(value) => Ok(Some(value)),
            Err(InputError::MissingField { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn invalid(&self, field: &'static str) -> InputError {
        InputError::InvalidValue {
            field,
            value: self.0.get(field).cloned().unwrap_or_default(),
        }
    }
}

trait Numeric: Sized {
    fn coerce(value: &str) -> Option<Self>;
}

impl Numeric for f64 {
    fn coerce(value: &str) -> Option<Self> {
        f64::from_str(value).ok().filter(|v| v.is_finite())
    }
}

macro_rules! integer_numeric {
    ($($ty:ty),*) => {
        $(impl Numeric for $ty {
            fn coerce(value: &str) -> Option<Self> {
                <$ty>::from_str(value).ok()
            }
        })*
    };
}

integer_numeric!(u8, u32);

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn reference_fields() -> RawFields {
        [
            ("trips", "300"),
            ("stops", "4"),
            ("type", "traction"),
            ("counterbalance", "50"),
            ("load", "1000"),
            ("src", "30"),
            ("ssc", "3"),
            ("energy_ref", "1.0"),
            ("energy_short", "0.3"),
            ("speed", "1.0"),
            ("acceleration", "0.8"),
            ("jerk", "1.0"),
            ("door_time", "5"),
            ("idle_power", "0.1"),
            ("standby5", "0.05"),
            ("standby30", "0.02"),
            ("operating_days", "300"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn parses_reference_form() -> Result<(), InputError> {
        let params = parse(&reference_fields())?;

        assert_eq!(
            params,
            crate::estimation::vdi4707::tests::reference_params()
        );
        Ok(())
    }

    #[test]
    fn missing_field_is_named() {
        let mut fields = reference_fields();
        fields.remove("jerk");

        assert_eq!(
            parse(&fields),
            Err(InputError::MissingField { field: "jerk" })
        );
    }

    #[test]
    fn blank_field_counts_as_missing() {
        let mut fields = reference_fields();
        fields.insert("speed".to_string(), "   ".to_string());

        assert_eq!(
            parse(&fields),
            Err(InputError::MissingField { field: "speed" })
        );
    }

    #[test]
    fn non_numeric_field_is_invalid() {
        let mut fields = reference_fields();
        fields.insert("load".to_string(), "heavy".to_string());

        let err = parse(&fields).expect_err("load is not numeric");
        assert_eq!(
            err,
            InputError::InvalidValue {
                field: "load",
                value: "heavy".to_string()
            }
        );
        assert_eq!(err.field(), "load");
    }

    #[test]
    fn fractional_stop_count_is_invalid() {
        let mut fields = reference_fields();
        fields.insert("stops".to_string(), "4.5".to_string());

        assert!(matches!(
            parse(&fields),
            Err(InputError::InvalidValue { field: "stops", .. })
        ));
    }

    #[test]
    fn negative_trips_are_invalid() {
        let mut fields = reference_fields();
        fields.insert("trips".to_string(), "-1".to_string());

        assert!(matches!(
            parse(&fields),
            Err(InputError::InvalidValue { field: "trips", .. })
        ));
    }

    #[test]
    fn infinite_value_is_invalid() {
        let mut fields = reference_fields();
        fields.insert("src".to_string(), "inf".to_string());

        assert!(matches!(
            parse(&fields),
            Err(InputError::InvalidValue { field: "src", .. })
        ));
    }

    #[test]
    fn zero_trips_requires_usage_category() -> Result<(), InputError> {
        let mut fields = reference_fields();
        fields.insert("trips".to_string(), "0".to_string());

        assert_eq!(
            parse(&fields),
            Err(InputError::MissingField {
                field: "usage_category"
            })
        );

        fields.insert("usage_category".to_string(), "4".to_string());
        let params = parse(&fields)?;
        assert_eq!(params.usage_category, Some(4));
        Ok(())
    }

    #[test]
    fn out_of_range_usage_category_is_accepted() -> Result<(), InputError> {
        let mut fields = reference_fields();
        fields.insert("trips".to_string(), "0".to_string());
        fields.insert("usage_category".to_string(), "300".to_string());

        let params = parse(&fields)?;

        assert_eq!(params.usage_category, Some(300));
        Ok(())
    }

    #[test]
    fn express_zone_flag_one_requires_zone_fields() -> Result<(), InputError> {
        let mut fields = reference_fields();
        fields.insert("xpzone".to_string(), "1".to_string());
        assert_eq!(
            parse(&fields),
            Err(InputError::MissingField { field: "sez" })
        );

        fields.insert("sez".to_string(), "75".to_string());
        fields.insert("sfl".to_string(), "15".to_string());
        let params = parse(&fields)?;
        assert_eq!(
            params.express_zone,
            ExpressZone::Present {
                length_m: 75.0,
                lowest_floor_m: 15.0
            }
        );
        Ok(())
    }

    #[test]
    fn express_zone_flag_two_ignores_zone_fields() -> Result<(), InputError> {
        let mut fields = reference_fields();
        fields.insert("xpzone".to_string(), "2".to_string());
        fields.insert("sez".to_string(), "not used".to_string());

        let params = parse(&fields)?;
        assert_eq!(params.express_zone, ExpressZone::Absent);
        Ok(())
    }

    #[test]
    fn unknown_express_zone_flag_is_invalid() {
        let mut fields = reference_fields();
        fields.insert("xpzone".to_string(), "3".to_string());

        assert!(matches!(
            parse(&fields),
            Err(InputError::InvalidValue { field: "xpzone", .. })
        ));
    }

    #[test]
    fn json_numbers_and_strings_flatten() -> Result<(), InputError> {
        let body = json!({
            "trips": 300,
            "stops": "4",
            "load": 1000.5,
            "sez": null
        });
        let map = body.as_object().cloned().unwrap_or_default();

        let raw = fields_from_json(&map)?;

        assert_eq!(raw.get("trips").map(String::as_str), Some("300"));
        assert_eq!(raw.get("stops").map(String::as_str), Some("4"));
        assert_eq!(raw.get("load").map(String::as_str), Some("1000.5"));
        assert!(!raw.contains_key("sez"));
        Ok(())
    }

    #[test]
    fn json_nested_value_is_invalid() {
        let body = json!({ "speed": [1.0] });
        let map = body.as_object().cloned().unwrap_or_default();

        assert_eq!(
            fields_from_json(&map),
            Err(InputError::InvalidValue {
                field: "speed",
                value: "[1.0]".to_string()
            })
        );
    }
}
