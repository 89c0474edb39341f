//! Read-only tables of earlier diagnoses and vital signs.
//!
//! Rows come out in exactly the order the records came in; these views never
//! sort, filter or page.

use serde::Serialize;

pub mod diagnoses;
pub mod vitals;

pub use diagnoses::{project_diagnoses, Badge, BadgeStyle, DiagnosisRow, HistoricalDiagnosesView};
pub use vitals::{project_vitals, HistoricalVitalsView, VitalsRow};

/// Shown for a missing code or attribution.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown for missing free-text notes.
pub const NO_NOTES: &str = "-";

pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub struct EmptyState {
    pub message: &'static str,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "state", content = "rows", rename_all = "snake_case")]
pub enum HistoryTable<R> {
    Empty(EmptyState),
    Rows(Vec<R>),
}

impl<R> HistoryTable<R> {
    pub fn project<T>(records: &[T], empty: EmptyState, row: impl FnMut(&T) -> R) -> Self {
        if records.is_empty() {
            return Self::Empty(empty);
        }
        Self::Rows(records.iter().map(row).collect())
    }

    pub fn rows(&self) -> &[R] {
        match self {
            Self::Empty(_) => &[],
            Self::Rows(rows) => rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}

impl<R: TableRow> HistoryTable<R> {
    /// Column-aligned plain text, for terminals and logs.
    pub fn to_text(&self) -> String {
        let rows = match self {
            Self::Empty(empty) => return empty.message.to_string(),
            Self::Rows(rows) => rows,
        };

        let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();
        let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |values: Vec<&str>| {
            values
                .iter()
                .zip(&widths)
                .map(|(value, width)| {
                    let pad = width.saturating_sub(value.chars().count());
                    format!("{value}{}", " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![line(R::HEADERS.to_vec())];
        lines.extend(cells.iter().map(|row| line(row.iter().map(String::as_str).collect())));
        lines.join("\n")
    }
}
