use serde::Serialize;

use crate::display::DisplaySettings;
use crate::records::{RecordId, VitalSign};

use super::{EmptyState, HistoryTable, TableRow, NOT_AVAILABLE};

pub const EMPTY: EmptyState = EmptyState {
    message: "No vital signs recorded",
};

#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub struct VitalsRow {
    pub id: RecordId,
    pub recorded_at: String,
    pub temperature: String,
    pub blood_pressure: String,
    pub pulse_rate: String,
    pub respiratory_rate: String,
    pub recorded_by: String,
}

pub type HistoricalVitalsView = HistoryTable<VitalsRow>;

/// Each reading is rounded on its own: 119.6/79.4 shows as `120/79`.
pub fn format_blood_pressure(systolic: f64, diastolic: f64) -> String {
    format!("{}/{}", systolic.round() as i64, diastolic.round() as i64)
}

impl VitalsRow {
    pub fn project(record: &VitalSign, settings: &DisplaySettings) -> Self {
        Self {
            id: record.id,
            recorded_at: settings.format_timestamp(&record.recorded_at),
            temperature: format!("{}°C", record.temperature),
            blood_pressure: format_blood_pressure(
                record.blood_pressure_systolic,
                record.blood_pressure_diastolic,
            ),
            pulse_rate: format!("{} bpm", record.pulse_rate),
            respiratory_rate: format!("{}/min", record.respiratory_rate),
            recorded_by: record
                .recorded_by
                .as_ref()
                .map(|staff| staff.name.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
        }
    }
}

impl TableRow for VitalsRow {
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Temperature",
        "Blood Pressure",
        "Pulse",
        "Respiratory Rate",
        "Recorded By",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.recorded_at.clone(),
            self.temperature.clone(),
            self.blood_pressure.clone(),
            self.pulse_rate.clone(),
            self.respiratory_rate.clone(),
            self.recorded_by.clone(),
        ]
    }
}

pub fn project_vitals(records: &[VitalSign], settings: &DisplaySettings) -> HistoricalVitalsView {
    HistoryTable::project(records, EMPTY, |record| VitalsRow::project(record, settings))
}
