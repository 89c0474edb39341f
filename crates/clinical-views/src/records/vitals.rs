use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{numeric, RecordId, StaffRef};

/// One set of observations taken at check-in or on the ward.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VitalSign {
    pub id: RecordId,
    /// Degrees Celsius.
    #[serde(deserialize_with = "numeric::number_or_string")]
    pub temperature: f64,
    #[serde(deserialize_with = "numeric::number_or_string")]
    pub blood_pressure_systolic: f64,
    #[serde(deserialize_with = "numeric::number_or_string")]
    pub blood_pressure_diastolic: f64,
    #[serde(deserialize_with = "numeric::number_or_string")]
    pub pulse_rate: f64,
    #[serde(deserialize_with = "numeric::number_or_string")]
    pub respiratory_rate: f64,
    pub recorded_at: DateTime<Utc>,
    pub recorded_by: Option<StaffRef>,
}
