use std::fmt;

use crate::records::{Prescription, RecordId};

use super::draft::DraftField;

/// Mutations the caller performs on its own prescription data.
///
/// The panel and whichever entry form is mounted only invoke these; they never
/// change prescriptions themselves. Nothing is returned: outcomes (and
/// failures) surface through the caller's next render.
pub trait PrescriptionMutator: Send + Sync {
    fn submit(&self);

    fn update(&self);

    fn delete(&self, id: RecordId);

    fn edit(&self, prescription: &Prescription);

    fn cancel_edit(&self);

    /// Field-level setter for the in-progress single prescription.
    fn set_field(&self, field: DraftField, value: String);
}

impl<'a> fmt::Debug for dyn PrescriptionMutator + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrescriptionMutator")
    }
}
