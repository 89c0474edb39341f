use serde::{Deserialize, Serialize};

use crate::records::{Prescribable, RecordId};

/// Consultation status under which prescriptions may still be written.
pub const IN_PROGRESS_STATUS: &str = "in_progress";

pub const DEFAULT_TITLE: &str = "Prescriptions";

/// Whether the panel accepts changes.
///
/// An explicit flag always wins. Without one, the panel is editable only while
/// the consultation status is exactly [`IN_PROGRESS_STATUS`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Editability {
    pub explicit: Option<bool>,
    pub consultation_status: Option<String>,
}

impl Editability {
    pub fn explicit(editable: bool) -> Self {
        Self {
            explicit: Some(editable),
            consultation_status: None,
        }
    }

    pub fn from_status(status: impl Into<String>) -> Self {
        Self {
            explicit: None,
            consultation_status: Some(status.into()),
        }
    }

    pub fn resolve(&self) -> bool {
        if let Some(editable) = self.explicit {
            return editable;
        }
        self.consultation_status.as_deref() == Some(IN_PROGRESS_STATUS)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Presentation {
    pub wrap_in_container: bool,
    pub title: Option<String>,
}

impl Presentation {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

/// Everything the caller tells the panel about where it is mounted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct PanelContext {
    pub consultation_id: RecordId,
    pub prescribable: Prescribable,
    pub editability: Editability,
    pub presentation: Presentation,
}

impl PanelContext {
    pub fn for_consultation(consultation_id: RecordId) -> Self {
        Self {
            consultation_id,
            prescribable: Prescribable::Consultation {
                id: consultation_id,
            },
            editability: Editability::default(),
            presentation: Presentation::default(),
        }
    }

    pub fn with_prescribable(mut self, prescribable: Prescribable) -> Self {
        self.prescribable = prescribable;
        self
    }

    pub fn with_editability(mut self, editability: Editability) -> Self {
        self.editability = editability;
        self
    }

    pub fn wrapped(mut self, title: Option<String>) -> Self {
        self.presentation = Presentation {
            wrap_in_container: true,
            title,
        };
        self
    }

    pub fn is_editable(&self) -> bool {
        self.editability.resolve()
    }
}
