use serde::{Deserialize, Serialize};

use crate::records::RecordId;

use super::{aggregate::EntryMode, context::PanelContext};

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub enum Command {
    /// Mount the panel for a consultation or ward round
    OpenPanel {
        id: String,
        context: PanelContext,
    },

    /// Caller re-rendered with different context (status, title, target)
    ChangeContext {
        context: PanelContext,
    },

    /// Flip between single and batch entry. `abandon_edit` names the
    /// prescription being edited in the single form, if any.
    SwitchMode {
        mode: EntryMode,
        abandon_edit: Option<RecordId>,
    },
}
