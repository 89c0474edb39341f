/// Panel aggregate
pub mod aggregate;

/// Commands
pub mod commands;

/// Events
pub mod events;

/// Caller-supplied panel context
pub mod context;

/// In-progress single prescription
pub mod draft;

/// Mutation capability injected by the caller
pub mod mutator;

/// Entry surface layout
pub mod render;

/// View (read model)
pub mod view;

/// CQRS setup
pub mod cqrs;

pub use aggregate::{EntryMode, EntryPanel, Services, AGGREGATE_TYPE};
pub use commands::Command;
pub use context::{Editability, PanelContext, Presentation};
pub use draft::{DraftField, PrescriptionDraft};
pub use events::Event;
pub use mutator::PrescriptionMutator;
pub use render::{
    BatchEntryProps, Container, EntrySurface, FormState, ModeToggle, PanelData, PanelLayout,
    SharedEntryProps, SingleEntryProps,
};
pub use view::{Query, View};
