//! Consultation clinical-record views

/// Clinical record contracts
pub mod records;

/// Prescription entry panel
pub mod prescriptions;

/// Historical diagnosis and vital-sign tables
pub mod history;

/// Dosage and dispensing quantity helpers
pub mod dosage;

/// Display settings
pub mod display;

/// Domain errors
pub mod errors;

/// Domain events wrapper
pub mod event;

pub use display::DisplaySettings;
pub use errors::Error;
pub use event::{DomainEvent, EventLog};
