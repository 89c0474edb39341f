use std::{fs, path::Path};

use anyhow::Context;
use clinical_views::{
    prescriptions::{DraftField, Editability, PanelContext},
    records::{
        DiagnosisAssociation, Drug, Prescribable, Prescription, PreviousPrescription, RecordId,
        VitalSign,
    },
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub panel: PanelFixture,
    pub drugs: Vec<Drug>,
    #[serde(default)]
    pub prescriptions: Vec<Prescription>,
    #[serde(default)]
    pub previous_prescriptions: Vec<PreviousPrescription>,
    #[serde(default)]
    pub diagnoses: Vec<DiagnosisAssociation>,
    #[serde(default)]
    pub vitals: Vec<VitalSign>,
    #[serde(default)]
    pub script: Vec<Interaction>,
}

#[derive(Debug, Deserialize)]
pub struct PanelFixture {
    pub consultation_id: RecordId,
    pub consultation_status: Option<String>,
    pub editable: Option<bool>,
    pub prescribable: Option<Prescribable>,
    #[serde(default)]
    pub wrap_in_container: bool,
    pub title: Option<String>,
}

/// What the user does on the page, in order.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Interaction {
    ToggleMode,
    SetField { field: DraftField, value: String },
    Submit,
    Edit { prescription_id: RecordId },
    Update,
    CancelEdit,
    Delete { prescription_id: RecordId },
    /// Consultation moved to another status, e.g. `completed`.
    SetStatus { status: String },
}

impl PanelFixture {
    pub fn context(&self) -> PanelContext {
        self.context_with_status(self.consultation_status.clone())
    }

    pub fn context_with_status(&self, status: Option<String>) -> PanelContext {
        let mut context = PanelContext::for_consultation(self.consultation_id).with_editability(
            Editability {
                explicit: self.editable,
                consultation_status: status,
            },
        );
        if let Some(prescribable) = &self.prescribable {
            context = context.with_prescribable(prescribable.clone());
        }
        if self.wrap_in_container {
            context = context.wrapped(self.title.clone());
        }
        context
    }

    pub fn panel_id(&self) -> String {
        let prescribable = self.prescribable.clone().unwrap_or(Prescribable::Consultation {
            id: self.consultation_id,
        });
        format!("{}-{}", prescribable.kind(), prescribable.id())
    }
}

pub fn load(path: &Path) -> anyhow::Result<Fixture> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing fixture {}", path.display()))
}
