use cqrs_es::DomainEvent;
use serde::{Deserialize, Serialize};

use crate::records::RecordId;

use super::{aggregate::EntryMode, context::PanelContext};

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
    PanelOpened {
        id: String,
        context: PanelContext,
    },

    ContextChanged {
        context: PanelContext,
    },

    EditAbandoned {
        prescription_id: RecordId,
    },

    ModeSwitched {
        from: EntryMode,
        to: EntryMode,
    },
}

impl DomainEvent for Event {
    fn event_type(&self) -> String {
        match self {
            Event::PanelOpened { .. } => "PrescriptionPanel:Opened".to_string(),
            Event::ContextChanged { .. } => "PrescriptionPanel:ContextChanged".to_string(),
            Event::EditAbandoned { .. } => "PrescriptionPanel:EditAbandoned".to_string(),
            Event::ModeSwitched { .. } => "PrescriptionPanel:ModeSwitched".to_string(),
        }
    }

    fn event_version(&self) -> String {
        "1.0".to_string()
    }
}
