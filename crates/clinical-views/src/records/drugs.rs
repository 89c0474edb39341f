use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{numeric, RecordId};

/// Trailing pack-size suffix on catalogue names, e.g. `(24's)`, "(12`s)", `(6 tabs)`.
static PACK_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(\(\d+['`]?s?\)|\(\d+\s*tabs?\))\s*$").unwrap()
});

const TOPICAL_FORMS: [&str; 4] = ["cream", "ointment", "gel", "lotion"];

/// Drug catalogue entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    pub id: RecordId,
    pub name: String,
    pub form: String,
    pub strength: Option<String>,
    pub generic_name: Option<String>,
    pub brand_name: Option<String>,
    pub unit_type: String,
    pub bottle_size: Option<u32>,
    #[serde(default, deserialize_with = "numeric::option_number_or_string")]
    pub unit_price: Option<f64>,
}

/// How a drug is counted out at the pharmacy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnitKind {
    Piece,
    Bottle,
    Vial,
    Other,
}

impl Drug {
    pub fn unit_kind(&self) -> UnitKind {
        match self.unit_type.to_lowercase().as_str() {
            "piece" => UnitKind::Piece,
            "bottle" => UnitKind::Bottle,
            "vial" => UnitKind::Vial,
            _ => UnitKind::Other,
        }
    }

    /// Creams, ointments, gels and lotions are dispensed by the tube, not by dose.
    pub fn is_topical(&self) -> bool {
        let form = self.form.to_lowercase();
        TOPICAL_FORMS.contains(&form.as_str())
    }

    /// No price configured yet; billing cannot charge for it.
    pub fn is_unpriced(&self) -> bool {
        self.unit_price.map_or(true, |price| price == 0.0)
    }

    pub fn base_name(&self) -> &str {
        match PACK_SIZE.find(&self.name) {
            Some(found) => self.name[..found.start()].trim(),
            None => &self.name,
        }
    }

    pub fn pack_size(&self) -> Option<&str> {
        PACK_SIZE
            .captures(&self.name)
            .and_then(|captures| captures.get(1))
            .map(|found| found.as_str())
    }
}
