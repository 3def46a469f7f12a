use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::taxonomy::{ClothingType, Measurement, ProductCondition, ProductSize, ProductStatus};

/// The seven garment measurements in centimetres. Absent means "not taken".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(rename = "size_shoulder")]
    pub shoulder: Option<Decimal>,
    #[serde(rename = "size_chest")]
    pub chest: Option<Decimal>,
    #[serde(rename = "size_waist")]
    pub waist: Option<Decimal>,
    #[serde(rename = "size_hip")]
    pub hip: Option<Decimal>,
    #[serde(rename = "size_rise")]
    pub rise: Option<Decimal>,
    #[serde(rename = "size_leg")]
    pub leg: Option<Decimal>,
    #[serde(rename = "size_length")]
    pub length: Option<Decimal>,
}

impl Measurements {
    #[must_use]
    pub fn get(&self, kind: Measurement) -> Option<Decimal> {
        match kind {
            Measurement::Shoulder => self.shoulder,
            Measurement::Chest => self.chest,
            Measurement::Waist => self.waist,
            Measurement::Hip => self.hip,
            Measurement::Rise => self.rise,
            Measurement::Leg => self.leg,
            Measurement::Length => self.length,
        }
    }

    pub fn set(&mut self, kind: Measurement, value: Option<Decimal>) {
        let slot = match kind {
            Measurement::Shoulder => &mut self.shoulder,
            Measurement::Chest => &mut self.chest,
            Measurement::Waist => &mut self.waist,
            Measurement::Hip => &mut self.hip,
            Measurement::Rise => &mut self.rise,
            Measurement::Leg => &mut self.leg,
            Measurement::Length => &mut self.length,
        };
        *slot = value;
    }

    /// Returns `true` if no measurement is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Measurement::ALL.iter().all(|kind| self.get(*kind).is_none())
    }
}

/// A validated add/update form, ready for the before-write transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub status: ProductStatus,
    pub price: Decimal,
    pub condition: ProductCondition,
    pub size: ProductSize,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub clothing_type: ClothingType,
    pub is_deadstock: bool,
    #[serde(flatten)]
    pub measurements: Measurements,
}

/// A product as stored in one sheet row.
///
/// `status`, `condition`, `size` and `clothing_type` hold the raw stored
/// values: the sheet is edited by hand too, so they are not guaranteed to be
/// known taxonomy values. Measurements are shown as stored (already doubled
/// where applicable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub status: String,
    pub price: Decimal,
    pub condition: String,
    pub size: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub clothing_type: String,
    #[serde(flatten)]
    pub measurements: Measurements,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub archive_at: Option<DateTime<Utc>>,
    /// Carried by the row layout; no operation sets it.
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_deadstock: bool,
}

impl ProductRecord {
    /// Builds a fresh record from a (transformed) input.
    #[must_use]
    pub fn from_input(id: String, input: &ProductInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.clone(),
            status: input.status.as_str().to_string(),
            price: input.price,
            condition: input.condition.as_str().to_string(),
            size: input.size.as_str().to_string(),
            description: input.description.clone(),
            clothing_type: input.clothing_type.as_str().to_string(),
            measurements: input.measurements,
            created_at: Some(created_at),
            updated_at: None,
            archive_at: None,
            deleted_at: None,
            is_deadstock: input.is_deadstock,
        }
    }
}

/// Formats a price for display, e.g. `€25`.
#[must_use]
pub fn format_price(price: Decimal) -> String {
    format!("€{price}")
}

/// Formats a stored measurement for display. The stored value is shown as is.
#[must_use]
pub fn format_size(size: Option<Decimal>) -> String {
    match size {
        Some(value) => format!("{value}cm"),
        None => "N/A".to_string(),
    }
}
