use std::sync::Arc;

use async_trait::async_trait;
use cqrs_es::Aggregate;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

use super::{context::PanelContext, mutator::PrescriptionMutator, Command, Event};

/// Which entry surface is mounted
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// One prescription at a time, with edit/cancel of existing ones
    Single,
    /// Several rows staged and saved together
    Batch,
}

impl Default for EntryMode {
    fn default() -> Self {
        Self::Single
    }
}

impl EntryMode {
    pub fn other(self) -> Self {
        match self {
            Self::Single => Self::Batch,
            Self::Batch => Self::Single,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Batch => "Batch",
        }
    }
}

/// Prescription entry panel aggregate.
///
/// Holds only the entry mode and the context it was mounted with; every
/// clinical record stays with the caller.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct EntryPanel {
    pub id: String,
    pub context: PanelContext,
    pub mode: EntryMode,
}

pub const AGGREGATE_TYPE: &str = "PrescriptionPanel";

#[derive(Clone, new)]
pub struct Services {
    mutator: Arc<dyn PrescriptionMutator>,
}

impl Services {
    pub fn mutator(&self) -> &dyn PrescriptionMutator {
        self.mutator.as_ref()
    }
}

#[async_trait]
impl Aggregate for EntryPanel {
    type Command = Command;
    type Event = Event;
    type Error = Error;
    type Services = Services;

    fn aggregate_type() -> String {
        AGGREGATE_TYPE.to_string()
    }

    async fn handle(
        &self,
        command: Self::Command,
        services: &Self::Services,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            Command::OpenPanel { id, context } => {
                self.validate_new()?;

                Ok(vec![Event::PanelOpened { id, context }])
            }

            Command::ChangeContext { context } => {
                self.validate_existing()?;

                if context == self.context {
                    return Ok(vec![]);
                }
                Ok(vec![Event::ContextChanged { context }])
            }

            Command::SwitchMode { mode, abandon_edit } => {
                self.validate_existing()?;
                self.validate_editable()?;

                if mode == self.mode {
                    return Ok(vec![]);
                }

                let mut events = Vec::with_capacity(2);
                // Only leaving the single form drops its edit. The cancel runs
                // after every check above, but before the events are committed:
                // a failed commit leaves the mode unchanged with the edit gone.
                let leaving_single = self.mode == EntryMode::Single;
                if let Some(prescription_id) = abandon_edit.filter(|_| leaving_single) {
                    services.mutator().cancel_edit();
                    events.push(Event::EditAbandoned { prescription_id });
                }
                events.push(Event::ModeSwitched {
                    from: self.mode,
                    to: mode,
                });

                Ok(events)
            }
        }
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            Event::PanelOpened { id, context } => {
                self.id = id;
                self.context = context;
                self.mode = EntryMode::Single;
            }

            Event::ContextChanged { context } => {
                self.context = context;
            }

            // Edit selection is caller-owned.
            Event::EditAbandoned { .. } => {}

            Event::ModeSwitched { to, .. } => {
                self.mode = to;
            }
        }
    }
}

impl EntryPanel {
    pub fn is_editable(&self) -> bool {
        self.context.is_editable()
    }

    fn validate_new(&self) -> Result<(), Error> {
        if !self.id.is_empty() {
            return Err(Error::Uniqueness {
                field: "id".to_string(),
            });
        }
        Ok(())
    }

    fn validate_existing(&self) -> Result<(), Error> {
        if self.id.is_empty() {
            return Err(Error::NotFound {
                entity: AGGREGATE_TYPE.to_string(),
            });
        }
        Ok(())
    }

    fn validate_editable(&self) -> Result<(), Error> {
        if !self.is_editable() {
            return Err(Error::NotEditable);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use cqrs_es::test::TestFramework;

    use super::*;
    use crate::prescriptions::{DraftField, Editability};
    use crate::records::{Prescription, RecordId};

    #[derive(Default)]
    struct CancelCounter {
        cancelled: Mutex<usize>,
    }

    impl CancelCounter {
        fn count(&self) -> usize {
            *self.cancelled.lock().unwrap()
        }
    }

    impl PrescriptionMutator for CancelCounter {
        fn submit(&self) {}
        fn update(&self) {}
        fn delete(&self, _id: RecordId) {}
        fn edit(&self, _prescription: &Prescription) {}
        fn cancel_edit(&self) {
            *self.cancelled.lock().unwrap() += 1;
        }
        fn set_field(&self, _field: DraftField, _value: String) {}
    }

    type PanelTestFramework = TestFramework<EntryPanel>;

    fn framework() -> (PanelTestFramework, Arc<CancelCounter>) {
        let counter = Arc::new(CancelCounter::default());
        let services = Services::new(counter.clone());
        (PanelTestFramework::with(services), counter)
    }

    fn editable_context() -> PanelContext {
        PanelContext::for_consultation(7).with_editability(Editability::from_status("in_progress"))
    }

    fn opened(context: PanelContext) -> Event {
        Event::PanelOpened {
            id: "consultation-7".to_string(),
            context,
        }
    }

    #[test]
    fn opens_in_single_mode() {
        let mut panel = EntryPanel::default();
        panel.apply(opened(editable_context()));

        assert_eq!(panel.mode, EntryMode::Single);
        assert_eq!(panel.id, "consultation-7");
    }

    #[test]
    fn open_emits_panel_opened() {
        let (framework, _) = framework();
        framework
            .given_no_previous_events()
            .when(Command::OpenPanel {
                id: "consultation-7".to_string(),
                context: editable_context(),
            })
            .then_expect_events(vec![opened(editable_context())]);
    }

    #[test]
    fn cannot_open_twice() {
        let (framework, _) = framework();
        framework
            .given(vec![opened(editable_context())])
            .when(Command::OpenPanel {
                id: "consultation-7".to_string(),
                context: editable_context(),
            })
            .then_expect_error(Error::Uniqueness {
                field: "id".to_string(),
            });
    }

    #[test]
    fn switch_requires_open_panel() {
        let (framework, _) = framework();
        framework
            .given_no_previous_events()
            .when(Command::SwitchMode {
                mode: EntryMode::Batch,
                abandon_edit: None,
            })
            .then_expect_error(Error::NotFound {
                entity: AGGREGATE_TYPE.to_string(),
            });
    }

    #[test]
    fn switches_to_batch() {
        let (framework, counter) = framework();
        framework
            .given(vec![opened(editable_context())])
            .when(Command::SwitchMode {
                mode: EntryMode::Batch,
                abandon_edit: None,
            })
            .then_expect_events(vec![Event::ModeSwitched {
                from: EntryMode::Single,
                to: EntryMode::Batch,
            }]);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn switching_to_current_mode_is_a_no_op() {
        let (framework, _) = framework();
        framework
            .given(vec![opened(editable_context())])
            .when(Command::SwitchMode {
                mode: EntryMode::Single,
                abandon_edit: Some(3),
            })
            .then_expect_events(vec![]);
    }

    #[test]
    fn switching_abandons_the_edit_in_progress() {
        let (framework, counter) = framework();
        framework
            .given(vec![opened(editable_context())])
            .when(Command::SwitchMode {
                mode: EntryMode::Batch,
                abandon_edit: Some(3),
            })
            .then_expect_events(vec![
                Event::EditAbandoned { prescription_id: 3 },
                Event::ModeSwitched {
                    from: EntryMode::Single,
                    to: EntryMode::Batch,
                },
            ]);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn returning_to_single_keeps_the_edit() {
        let (framework, counter) = framework();
        framework
            .given(vec![
                opened(editable_context()),
                Event::ModeSwitched {
                    from: EntryMode::Single,
                    to: EntryMode::Batch,
                },
            ])
            .when(Command::SwitchMode {
                mode: EntryMode::Single,
                abandon_edit: Some(3),
            })
            .then_expect_events(vec![Event::ModeSwitched {
                from: EntryMode::Batch,
                to: EntryMode::Single,
            }]);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn rejected_switch_leaves_the_edit_alone() {
        let (framework, counter) = framework();
        let completed = PanelContext::for_consultation(7)
            .with_editability(Editability::from_status("completed"));
        framework
            .given(vec![opened(completed)])
            .when(Command::SwitchMode {
                mode: EntryMode::Batch,
                abandon_edit: Some(3),
            })
            .then_expect_error(Error::NotEditable);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn read_only_panel_rejects_switch() {
        let (framework, _) = framework();
        let completed = PanelContext::for_consultation(7)
            .with_editability(Editability::from_status("completed"));
        framework
            .given(vec![opened(completed)])
            .when(Command::SwitchMode {
                mode: EntryMode::Batch,
                abandon_edit: None,
            })
            .then_expect_error(Error::NotEditable);
    }

    #[test]
    fn unchanged_context_emits_nothing() {
        let (framework, _) = framework();
        framework
            .given(vec![opened(editable_context())])
            .when(Command::ChangeContext {
                context: editable_context(),
            })
            .then_expect_events(vec![]);
    }

    #[test]
    fn context_change_keeps_mode() {
        let mut panel = EntryPanel::default();
        panel.apply(opened(editable_context()));
        panel.apply(Event::ModeSwitched {
            from: EntryMode::Single,
            to: EntryMode::Batch,
        });

        let completed = PanelContext::for_consultation(7)
            .with_editability(Editability::from_status("completed"));
        panel.apply(Event::ContextChanged { context: completed });

        assert_eq!(panel.mode, EntryMode::Batch);
        assert!(!panel.is_editable());
    }

    #[test]
    fn mode_other_round_trips() {
        assert_eq!(EntryMode::Single.other(), EntryMode::Batch);
        assert_eq!(EntryMode::Single.other().other(), EntryMode::Single);
    }
}
