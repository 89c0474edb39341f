//! Read model of a mounted panel: its current state plus what the user did
//! to it since it was opened.

use async_trait::async_trait;
use cqrs_es::{
    persist::{PersistenceError, ViewContext},
    Aggregate, EventEnvelope, View as CqrsView,
};
use serde::{Deserialize, Serialize};

use crate::records::RecordId;

use super::{cqrs::PanelRepository, EntryPanel, Event, AGGREGATE_TYPE};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct View {
    pub aggregate_type: String,
    /// Command that produced the latest event.
    pub command_id: String,
    pub id: String,
    pub panel: EntryPanel,
    pub mode_switches: u32,
    /// Prescriptions whose single-entry edit a mode switch dropped, oldest first.
    pub abandoned_edits: Vec<RecordId>,
}

impl CqrsView<EntryPanel> for View {
    fn update(&mut self, event: &EventEnvelope<EntryPanel>) {
        if self.id.is_empty() {
            self.id.clone_from(&event.aggregate_id);
            self.aggregate_type = AGGREGATE_TYPE.to_string();
        }
        if let Some(command_id) = event.metadata.get("command_id") {
            self.command_id.clone_from(command_id);
        }

        match &event.payload {
            Event::EditAbandoned { prescription_id } => self.abandoned_edits.push(*prescription_id),
            Event::ModeSwitched { .. } => self.mode_switches += 1,
            Event::PanelOpened { .. } | Event::ContextChanged { .. } => {}
        }
        self.panel.apply(event.payload.clone());
    }
}

pub struct Query {
    repo: PanelRepository,
}

impl Query {
    pub fn new(repo: PanelRepository) -> Self {
        Self { repo }
    }

    async fn project(
        &self,
        panel_id: &str,
        events: &[EventEnvelope<EntryPanel>],
    ) -> Result<(), PersistenceError> {
        let (mut view, view_context) = self
            .repo
            .load_with_context(panel_id)
            .await?
            .unwrap_or_else(|| (View::default(), ViewContext::new(panel_id.to_string(), 0)));

        for event in events {
            view.update(event);
        }

        self.repo.update_view(view, view_context).await
    }
}

#[async_trait]
impl cqrs_es::Query<EntryPanel> for Query {
    async fn dispatch(&self, panel_id: &str, events: &[EventEnvelope<EntryPanel>]) {
        let result = match self.project(panel_id, events).await {
            // Another dispatch for this panel committed first; rebuild on top of it.
            Err(PersistenceError::OptimisticLockError) => {
                tracing::warn!("Panel view {} was stale, reprojecting", panel_id);
                self.project(panel_id, events).await
            }
            result => result,
        };

        if let Err(err) = result {
            tracing::error!("PanelQuery error for {}: {}", panel_id, err);
        }
    }
}
