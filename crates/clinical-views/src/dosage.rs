//! Dispensing quantity rules shared by the single and batch entry forms.

use std::sync::LazyLock;

use regex::Regex;

use crate::records::{Drug, UnitKind};

pub const STAT: &str = "STAT (Immediately)";
pub const SINGLE_DOSE: &str = "Single dose";

static DAYS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s+days?$").unwrap());
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)").unwrap());

/// Administrations per day for the catalogue frequency labels.
pub fn daily_count(frequency: &str) -> Option<u32> {
    let count = match frequency {
        STAT | "Once daily" | "At night (Nocte)" | "At bedtime" => 1,
        "Twice daily (BID)" | "Every 12 hours" => 2,
        "Three times daily (TID)" | "Every 8 hours" => 3,
        "Four times daily (QID)" | "Every 6 hours" | "As needed (PRN)" => 4,
        "Every 4 hours" => 6,
        _ => return None,
    };
    Some(count)
}

/// `"5 days"` → 5. Anything else ("Single dose", "As directed") has no day count.
pub fn duration_days(duration: &str) -> Option<u32> {
    DAYS.captures(duration.trim())?.get(1)?.as_str().parse().ok()
}

fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Units per dose; an empty, unreadable or zero dose counts as one.
fn dose_units(dose_quantity: &str) -> u32 {
    leading_number(dose_quantity)
        .map(|dose| dose.trunc() as u32)
        .filter(|dose| *dose > 0)
        .unwrap_or(1)
}

/// What the form should do with its quantity-to-dispense field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuantitySuggestion {
    Set(u32),
    /// Pharmacy decides; blank the field.
    Clear,
    /// Leave whatever the prescriber typed.
    Keep,
}

pub fn suggest_quantity(
    drug: &Drug,
    frequency: &str,
    duration: &str,
    dose_quantity: &str,
) -> QuantitySuggestion {
    if drug.is_topical() {
        return QuantitySuggestion::Keep;
    }

    if frequency == STAT {
        return match drug.unit_kind() {
            UnitKind::Piece => QuantitySuggestion::Set(dose_units(dose_quantity)),
            UnitKind::Bottle => QuantitySuggestion::Set(1),
            UnitKind::Vial => QuantitySuggestion::Clear,
            UnitKind::Other => QuantitySuggestion::Keep,
        };
    }

    if frequency.is_empty() || duration.is_empty() {
        return QuantitySuggestion::Keep;
    }

    let unit_kind = drug.unit_kind();
    match unit_kind {
        UnitKind::Piece => {
            let (Some(daily), Some(days)) = (daily_count(frequency), duration_days(duration)) else {
                return QuantitySuggestion::Keep;
            };
            dose_units(dose_quantity)
                .checked_mul(daily)
                .and_then(|per_day| per_day.checked_mul(days))
                .map_or(QuantitySuggestion::Keep, QuantitySuggestion::Set)
        }
        UnitKind::Bottle | UnitKind::Vial if drug.bottle_size.is_some_and(|size| size > 0) => {
            QuantitySuggestion::Set(estimate_bottles(
                frequency,
                duration,
                unit_kind,
                Some(dose_quantity),
                drug.bottle_size,
            ))
        }
        UnitKind::Vial => QuantitySuggestion::Keep,
        UnitKind::Bottle | UnitKind::Other => QuantitySuggestion::Set(1),
    }
}

/// Bottles (or vials) of liquid needed to cover the course, rounded up.
///
/// Dose defaults to 5 ml; container size falls back to 100 ml for bottles and
/// 10 ml otherwise.
pub fn estimate_bottles(
    frequency: &str,
    duration: &str,
    unit_kind: UnitKind,
    dose_quantity: Option<&str>,
    bottle_size: Option<u32>,
) -> u32 {
    let (Some(daily), Some(days)) = (daily_count(frequency), duration_days(duration)) else {
        return 1;
    };

    let ml_per_dose = dose_quantity.and_then(leading_number).unwrap_or(5.0);
    let total_ml = f64::from(daily) * f64::from(days) * ml_per_dose;
    let container_ml = match bottle_size.filter(|size| *size > 0) {
        Some(size) => f64::from(size),
        None if unit_kind == UnitKind::Bottle => 100.0,
        None => 10.0,
    };

    // Float to int casts saturate at u32::MAX.
    (total_ml / container_ml).ceil() as u32
}
