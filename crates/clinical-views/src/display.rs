use std::env;

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::errors::Error;

/// Offset applied to timestamps before they are shown, in whole minutes east of UTC.
pub const UTC_OFFSET_VAR: &str = "CLINICAL_VIEWS_UTC_OFFSET_MINUTES";

/// e.g. `Jan 5, 2025, 09:30 AM`
pub const TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DisplaySettings {
    pub offset: FixedOffset,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl DisplaySettings {
    pub fn from_env() -> Result<Self, Error> {
        let raw = env::var(UTC_OFFSET_VAR).unwrap_or("0".to_string());
        Self::from_offset_minutes(&raw)
    }

    pub fn from_offset_minutes(raw: &str) -> Result<Self, Error> {
        let config_error = |message: String| Error::Config {
            key: UTC_OFFSET_VAR.to_string(),
            message,
        };

        let minutes: i32 = raw
            .trim()
            .parse()
            .map_err(|_| config_error(format!("expected whole minutes, got {raw:?}")))?;

        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| config_error(format!("offset of {minutes} minutes is out of range")))?;

        Ok(Self { offset })
    }

    pub fn format_timestamp(&self, at: &DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }
}
