use serde::Serialize;

use crate::display::DisplaySettings;
use crate::records::{DiagnosisAssociation, RecordId};

use super::{EmptyState, HistoryTable, TableRow, NOT_AVAILABLE, NO_NOTES};

pub const EMPTY: EmptyState = EmptyState {
    message: "No diagnoses recorded",
};

/// Visual treatment of the diagnosis-type badge.
#[derive(Clone, Copy, Debug, Default, Serialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStyle {
    Provisional,
    Principal,
    Differential,
    #[default]
    Plain,
}

#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub struct Badge {
    pub label: String,
    pub style: BadgeStyle,
}

impl Badge {
    /// Unknown categories are shown verbatim with the plain style.
    pub fn for_category(category: &str) -> Self {
        let (label, style) = match category {
            "provisional" => ("Provisional", BadgeStyle::Provisional),
            "principal" => ("Principal", BadgeStyle::Principal),
            "differential" => ("Differential", BadgeStyle::Differential),
            other => (other, BadgeStyle::Plain),
        };
        Self {
            label: label.to_string(),
            style,
        }
    }
}

#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub struct DiagnosisRow {
    pub id: RecordId,
    pub recorded_at: String,
    pub diagnosis: String,
    pub code: Option<String>,
    pub badge: Badge,
    pub icd_10: String,
    pub notes: String,
    pub doctor: String,
}

pub type HistoricalDiagnosesView = HistoryTable<DiagnosisRow>;

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

impl DiagnosisRow {
    pub fn project(record: &DiagnosisAssociation, settings: &DisplaySettings) -> Self {
        let diagnosis = &record.diagnosis;
        Self {
            id: record.id,
            recorded_at: settings.format_timestamp(&record.created_at),
            diagnosis: diagnosis.diagnosis.clone(),
            code: present(diagnosis.code.as_deref()).map(str::to_string),
            badge: Badge::for_category(&record.category),
            icd_10: present(diagnosis.icd_10.as_deref())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            notes: present(record.notes.as_deref())
                .unwrap_or(NO_NOTES)
                .to_string(),
            doctor: present(record.doctor().map(|doctor| doctor.name.as_str()))
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
        }
    }
}

impl TableRow for DiagnosisRow {
    const HEADERS: &'static [&'static str] = &["Date", "Diagnosis", "Type", "ICD-10", "Notes", "Doctor"];

    fn cells(&self) -> Vec<String> {
        let diagnosis = match &self.code {
            Some(code) => format!("{} ({})", self.diagnosis, code),
            None => self.diagnosis.clone(),
        };
        vec![
            self.recorded_at.clone(),
            diagnosis,
            self.badge.label.clone(),
            self.icd_10.clone(),
            self.notes.clone(),
            self.doctor.clone(),
        ]
    }
}

pub fn project_diagnoses(
    records: &[DiagnosisAssociation],
    settings: &DisplaySettings,
) -> HistoricalDiagnosesView {
    HistoryTable::project(records, EMPTY, |record| DiagnosisRow::project(record, settings))
}
