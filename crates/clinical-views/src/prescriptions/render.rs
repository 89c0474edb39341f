//! Layout of the prescription panel for one render pass.
//!
//! Nothing here owns data: every slice and reference is the caller's, passed
//! down unchanged to whichever entry form is mounted.

use derive_new::new;
use serde::Serialize;

use crate::records::{Drug, Prescribable, Prescription, PreviousPrescription, RecordId};

use super::{
    aggregate::{EntryMode, EntryPanel},
    draft::PrescriptionDraft,
    mutator::PrescriptionMutator,
    Command,
};

pub const TOGGLE_ARIA_LABEL: &str = "Toggle batch mode";

/// Single-entry form state the caller tracks between renders.
#[derive(Clone, Copy, Debug, new)]
pub struct FormState<'a> {
    pub draft: &'a PrescriptionDraft,
    pub editing: Option<&'a Prescription>,
    pub processing: bool,
}

/// Reference data for one render.
#[derive(Clone, Copy, Debug, new)]
pub struct PanelData<'a> {
    pub drugs: &'a [Drug],
    pub prescriptions: &'a [Prescription],
    #[new(default)]
    pub previous_prescriptions: &'a [PreviousPrescription],
    pub form: FormState<'a>,
}

impl<'a> PanelData<'a> {
    pub fn with_previous(mut self, previous_prescriptions: &'a [PreviousPrescription]) -> Self {
        self.previous_prescriptions = previous_prescriptions;
        self
    }
}

/// Compact single/batch switch placed in the active form's header.
#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub struct ModeToggle {
    pub mode: EntryMode,
    pub label: &'static str,
    pub aria_label: &'static str,
    /// Prescription open in the single form when the toggle was rendered.
    pub editing: Option<RecordId>,
}

impl ModeToggle {
    pub fn new(mode: EntryMode, editing: Option<RecordId>) -> Self {
        Self {
            mode,
            label: mode.label(),
            aria_label: TOGGLE_ARIA_LABEL,
            editing,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.mode == EntryMode::Batch
    }

    pub fn switch_to(&self, mode: EntryMode) -> Command {
        Command::SwitchMode {
            mode,
            abandon_edit: self.editing,
        }
    }

    pub fn toggle(&self) -> Command {
        self.switch_to(self.mode.other())
    }
}

#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub struct Container {
    pub title: String,
}

/// Props both entry forms receive.
#[derive(Clone, Debug, Serialize)]
pub struct SharedEntryProps<'a> {
    pub drugs: &'a [Drug],
    pub prescriptions: &'a [Prescription],
    pub previous_prescriptions: &'a [PreviousPrescription],
    pub prescribable: &'a Prescribable,
    pub consultation_id: RecordId,
    pub is_editable: bool,
    pub header_extra: Option<ModeToggle>,
    #[serde(skip)]
    pub mutator: &'a dyn PrescriptionMutator,
}

#[derive(Clone, Debug, Serialize)]
pub struct SingleEntryProps<'a> {
    #[serde(flatten)]
    pub shared: SharedEntryProps<'a>,
    pub draft: &'a PrescriptionDraft,
    pub editing: Option<&'a Prescription>,
    pub processing: bool,
}

impl SingleEntryProps<'_> {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Refill from an earlier consultation is offered only on a fresh entry.
    pub fn can_refill(&self) -> bool {
        self.shared.is_editable
            && !self.is_editing()
            && !self.shared.previous_prescriptions.is_empty()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchEntryProps<'a> {
    #[serde(flatten)]
    pub shared: SharedEntryProps<'a>,
}

/// The one entry form mounted for this render.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum EntrySurface<'a> {
    Single(SingleEntryProps<'a>),
    Batch(BatchEntryProps<'a>),
}

impl<'a> EntrySurface<'a> {
    pub fn mode(&self) -> EntryMode {
        match self {
            Self::Single(_) => EntryMode::Single,
            Self::Batch(_) => EntryMode::Batch,
        }
    }

    pub fn shared(&self) -> &SharedEntryProps<'a> {
        match self {
            Self::Single(props) => &props.shared,
            Self::Batch(props) => &props.shared,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PanelLayout<'a> {
    pub container: Option<Container>,
    pub entry: EntrySurface<'a>,
}

impl PanelLayout<'_> {
    pub fn toggle(&self) -> Option<&ModeToggle> {
        self.entry.shared().header_extra.as_ref()
    }
}

impl EntryPanel {
    pub fn render<'a>(
        &'a self,
        data: PanelData<'a>,
        mutator: &'a dyn PrescriptionMutator,
    ) -> PanelLayout<'a> {
        let is_editable = self.is_editable();
        // An edit is only in progress while the single form is mounted.
        let editing = data
            .form
            .editing
            .filter(|_| self.mode == EntryMode::Single)
            .map(|editing| editing.id);
        let header_extra = is_editable.then(|| ModeToggle::new(self.mode, editing));

        let shared = SharedEntryProps {
            drugs: data.drugs,
            prescriptions: data.prescriptions,
            previous_prescriptions: data.previous_prescriptions,
            prescribable: &self.context.prescribable,
            consultation_id: self.context.consultation_id,
            is_editable,
            header_extra,
            mutator,
        };

        let entry = match self.mode {
            EntryMode::Single => EntrySurface::Single(SingleEntryProps {
                shared,
                draft: data.form.draft,
                editing: data.form.editing,
                processing: data.form.processing,
            }),
            EntryMode::Batch => EntrySurface::Batch(BatchEntryProps { shared }),
        };

        let presentation = &self.context.presentation;
        let container = presentation.wrap_in_container.then(|| Container {
            title: presentation.title().to_string(),
        });

        PanelLayout { container, entry }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prescriptions::{DraftField, Editability, Event, PanelContext};
    use cqrs_es::Aggregate;

    struct Inert;

    impl PrescriptionMutator for Inert {
        fn submit(&self) {}
        fn update(&self) {}
        fn delete(&self, _id: RecordId) {}
        fn edit(&self, _prescription: &Prescription) {}
        fn cancel_edit(&self) {}
        fn set_field(&self, _field: DraftField, _value: String) {}
    }

    fn panel(context: PanelContext) -> EntryPanel {
        let mut panel = EntryPanel::default();
        panel.apply(Event::PanelOpened {
            id: format!("consultation-{}", context.consultation_id),
            context,
        });
        panel
    }

    fn switched(mut panel: EntryPanel, to: EntryMode) -> EntryPanel {
        panel.apply(Event::ModeSwitched {
            from: panel.mode,
            to,
        });
        panel
    }

    fn prescription(id: RecordId) -> Prescription {
        Prescription {
            id,
            medication_name: "Paracetamol 500mg".to_string(),
            frequency: "Three times daily (TID)".to_string(),
            duration: "3 days".to_string(),
            dose_quantity: Some("2".to_string()),
            quantity_to_dispense: Some(18),
            instructions: None,
            status: "prescribed".to_string(),
            drug_id: Some(1),
            refilled_from_prescription_id: None,
        }
    }

    fn editable() -> PanelContext {
        PanelContext::for_consultation(7).with_editability(Editability::from_status("in_progress"))
    }

    #[test]
    fn editable_single_mode_renders_toggle_in_form_header() {
        let panel = panel(editable());
        let draft = PrescriptionDraft::default();
        let layout = panel.render(PanelData::new(&[], &[], FormState::new(&draft, None, false)), &Inert);

        let toggle = layout.toggle().expect("toggle rendered");
        assert_eq!(toggle.mode, EntryMode::Single);
        assert_eq!(toggle.label, "Single");
        assert!(!toggle.is_checked());
        assert!(matches!(layout.entry, EntrySurface::Single(_)));
        assert!(layout.container.is_none());
    }

    #[test]
    fn read_only_panel_has_no_toggle() {
        let context =
            PanelContext::for_consultation(7).with_editability(Editability::from_status("completed"));
        let panel = panel(context);
        let draft = PrescriptionDraft::default();
        let layout = panel.render(PanelData::new(&[], &[], FormState::new(&draft, None, false)), &Inert);

        assert!(layout.toggle().is_none());
        assert!(!layout.entry.shared().is_editable);
        assert_eq!(layout.entry.mode(), EntryMode::Single);
    }

    #[test]
    fn batch_mode_forwards_the_same_reference_data() {
        let panel = switched(panel(editable()), EntryMode::Batch);
        let prescriptions = vec![prescription(1), prescription(2)];
        let draft = PrescriptionDraft::default();
        let data = PanelData::new(&[], &prescriptions, FormState::new(&draft, None, true));
        let layout = panel.render(data, &Inert);

        let EntrySurface::Batch(props) = &layout.entry else {
            panic!("expected batch surface");
        };
        assert!(std::ptr::eq(props.shared.prescriptions, prescriptions.as_slice()));
        assert_eq!(props.shared.prescribable, &Prescribable::Consultation { id: 7 });
        assert!(props.shared.header_extra.as_ref().unwrap().is_checked());
        assert_eq!(props.shared.header_extra.as_ref().unwrap().label, "Batch");
    }

    #[test]
    fn single_mode_forwards_form_state() {
        let panel = panel(editable());
        let prescriptions = vec![prescription(4)];
        let draft = PrescriptionDraft::from_prescription(&prescriptions[0]);
        let data = PanelData::new(&[], &prescriptions, FormState::new(&draft, Some(&prescriptions[0]), true));
        let layout = panel.render(data, &Inert);

        let EntrySurface::Single(props) = &layout.entry else {
            panic!("expected single surface");
        };
        assert!(props.is_editing());
        assert!(props.processing);
        assert!(std::ptr::eq(props.draft, &draft));
        assert_eq!(layout.toggle().unwrap().editing, Some(4));
        assert_eq!(
            layout.toggle().unwrap().toggle(),
            Command::SwitchMode {
                mode: EntryMode::Batch,
                abandon_edit: Some(4),
            }
        );
    }

    #[test]
    fn batch_toggle_does_not_carry_a_stale_edit() {
        let panel = switched(panel(editable()), EntryMode::Batch);
        let prescriptions = vec![prescription(4)];
        let draft = PrescriptionDraft::from_prescription(&prescriptions[0]);
        let data = PanelData::new(&[], &prescriptions, FormState::new(&draft, Some(&prescriptions[0]), false));
        let layout = panel.render(data, &Inert);

        let toggle = layout.toggle().unwrap();
        assert_eq!(toggle.editing, None);
        assert_eq!(
            toggle.toggle(),
            Command::SwitchMode {
                mode: EntryMode::Single,
                abandon_edit: None,
            }
        );
    }

    #[test]
    fn ward_round_admission_reaches_the_form() {
        let context = editable().with_prescribable(Prescribable::WardRound {
            id: 30,
            admission_id: 11,
        });
        let panel = switched(panel(context), EntryMode::Batch);
        let draft = PrescriptionDraft::default();
        let layout = panel.render(PanelData::new(&[], &[], FormState::new(&draft, None, false)), &Inert);

        let shared = layout.entry.shared();
        assert_eq!(shared.prescribable.kind(), "ward_round");
        assert_eq!(shared.prescribable.admission_id(), Some(11));
        assert_eq!(shared.consultation_id, 7);
    }

    #[test]
    fn wrapped_panel_gets_titled_container() {
        let panel = panel(editable().wrapped(None));
        let draft = PrescriptionDraft::default();
        let layout = panel.render(PanelData::new(&[], &[], FormState::new(&draft, None, false)), &Inert);

        assert_eq!(
            layout.container,
            Some(Container {
                title: "Prescriptions".to_string()
            })
        );
    }

    #[test]
    fn refill_needs_history_and_a_fresh_entry() {
        let panel = panel(editable());
        let draft = PrescriptionDraft::default();
        let previous: Vec<PreviousPrescription> = serde_json::from_str(
            r#"[{
                "id": 31, "medication_name": "Metformin 500mg", "frequency": "Once daily",
                "duration": "30 days", "status": "dispensed",
                "consultation": {"id": 8, "started_at": "2025-02-10T08:15:00Z",
                    "doctor": {"id": 2, "name": "Dr. Mensah"},
                    "patient_checkin": {"department": {"id": 4, "name": "OPD"}}}
            }]"#,
        )
        .unwrap();
        let current = prescription(5);

        let fresh = PanelData::new(&[], &[], FormState::new(&draft, None, false)).with_previous(&previous);
        let EntrySurface::Single(props) = panel.render(fresh, &Inert).entry else {
            panic!("expected single surface");
        };
        assert!(props.can_refill());

        let editing =
            PanelData::new(&[], &[], FormState::new(&draft, Some(&current), false)).with_previous(&previous);
        let EntrySurface::Single(props) = panel.render(editing, &Inert).entry else {
            panic!("expected single surface");
        };
        assert!(!props.can_refill());
    }

    #[test]
    fn layout_serializes_without_the_mutator() {
        let panel = switched(panel(editable()), EntryMode::Batch);
        let draft = PrescriptionDraft::default();
        let layout = panel.render(PanelData::new(&[], &[], FormState::new(&draft, None, false)), &Inert);

        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["entry"]["mode"], "batch");
        assert_eq!(json["entry"]["prescribable"]["type"], "consultation");
        assert_eq!(json["entry"]["header_extra"]["label"], "Batch");
        assert!(json["entry"].get("mutator").is_none());
    }
}
