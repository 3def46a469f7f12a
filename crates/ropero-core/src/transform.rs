//! Conversions between validated input, stored sheet rows and typed records.
//!
//! Doubling of half-measurements happens once, before write. Rows read back
//! are never halved: the stored value is the finished-garment measurement.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::product::{Measurements, ProductInput, ProductRecord};
use crate::taxonomy::Measurement;

/// Column positions of the product sheet.
pub mod columns {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const STATUS: usize = 2;
    pub const PRICE: usize = 3;
    pub const CONDITION: usize = 4;
    pub const SIZE: usize = 5;
    pub const DESCRIPTION: usize = 6;
    pub const TYPE: usize = 7;
    pub const SIZE_SHOULDER: usize = 8;
    pub const SIZE_CHEST: usize = 9;
    pub const SIZE_WAIST: usize = 10;
    pub const SIZE_HIP: usize = 11;
    pub const SIZE_RISE: usize = 12;
    pub const SIZE_LEG: usize = 13;
    pub const SIZE_LENGTH: usize = 14;
    pub const CREATED_AT: usize = 15;
    pub const UPDATED_AT: usize = 16;
    pub const ARCHIVE_AT: usize = 17;
    pub const DELETED_AT: usize = 18;
    /// Legacy flag, written as `TRUE`/`FALSE`.
    pub const IS_DEADSTOCK: usize = 19;

    /// Total columns written per row (`A` through `T`).
    pub const COUNT: usize = 20;

    /// Header row labels, in column order.
    pub const NAMES: [&str; COUNT] = [
        "id",
        "name",
        "status",
        "price",
        "condition",
        "size",
        "description",
        "type",
        "size_shoulder",
        "size_chest",
        "size_waist",
        "size_hip",
        "size_rise",
        "size_leg",
        "size_length",
        "created_at",
        "updated_at",
        "archive_at",
        "deleted_at",
        "is_deadstock",
    ];
}

/// The header row as written to a fresh sheet.
#[must_use]
pub fn header_row() -> Vec<String> {
    columns::NAMES.iter().map(|name| (*name).to_string()).collect()
}

fn measurement_column(kind: Measurement) -> usize {
    match kind {
        Measurement::Shoulder => columns::SIZE_SHOULDER,
        Measurement::Chest => columns::SIZE_CHEST,
        Measurement::Waist => columns::SIZE_WAIST,
        Measurement::Hip => columns::SIZE_HIP,
        Measurement::Rise => columns::SIZE_RISE,
        Measurement::Leg => columns::SIZE_LEG,
        Measurement::Length => columns::SIZE_LENGTH,
    }
}

/// Doubles chest, waist, hip and leg; leaves the other fields untouched.
/// Absent measurements stay absent.
#[must_use]
pub fn transform_before_write(input: &ProductInput) -> ProductInput {
    let mut transformed = input.clone();
    for kind in Measurement::ALL.into_iter().filter(|k| k.is_doubled()) {
        let doubled = input
            .measurements
            .get(kind)
            .map(|value| (value * Decimal::TWO).normalize());
        transformed.measurements.set(kind, doubled);
    }
    transformed
}

/// Serializes a record into the 20-column sheet layout.
#[must_use]
pub fn to_row(record: &ProductRecord) -> Vec<String> {
    let mut row = vec![String::new(); columns::COUNT];
    row[columns::ID].clone_from(&record.id);
    row[columns::NAME].clone_from(&record.name);
    row[columns::STATUS].clone_from(&record.status);
    row[columns::PRICE] = record.price.to_string();
    row[columns::CONDITION].clone_from(&record.condition);
    row[columns::SIZE].clone_from(&record.size);
    row[columns::DESCRIPTION] = record.description.clone().unwrap_or_default();
    row[columns::TYPE].clone_from(&record.clothing_type);
    for kind in Measurement::ALL {
        row[measurement_column(kind)] = record
            .measurements
            .get(kind)
            .map(|v| v.to_string())
            .unwrap_or_default();
    }
    row[columns::CREATED_AT] = format_timestamp(record.created_at);
    row[columns::UPDATED_AT] = format_timestamp(record.updated_at);
    row[columns::ARCHIVE_AT] = format_timestamp(record.archive_at);
    row[columns::DELETED_AT] = format_timestamp(record.deleted_at);
    row[columns::IS_DEADSTOCK] = if record.is_deadstock { "TRUE" } else { "FALSE" }.to_string();
    row
}

/// Parses one stored row. Missing trailing cells read as empty.
#[must_use]
pub fn from_row(row: &[String]) -> ProductRecord {
    let cell = |idx: usize| row.get(idx).map_or("", |s| s.as_str());

    let mut measurements = Measurements::default();
    for kind in Measurement::ALL {
        measurements.set(kind, parse_decimal(cell(measurement_column(kind))));
    }

    let description = cell(columns::DESCRIPTION);

    ProductRecord {
        id: cell(columns::ID).to_string(),
        name: cell(columns::NAME).to_string(),
        status: cell(columns::STATUS).to_string(),
        price: parse_decimal(cell(columns::PRICE)).unwrap_or(Decimal::ZERO),
        condition: cell(columns::CONDITION).to_string(),
        size: cell(columns::SIZE).to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        clothing_type: cell(columns::TYPE).to_string(),
        measurements,
        created_at: parse_timestamp(cell(columns::CREATED_AT)),
        updated_at: parse_timestamp(cell(columns::UPDATED_AT)),
        archive_at: parse_timestamp(cell(columns::ARCHIVE_AT)),
        deleted_at: parse_timestamp(cell(columns::DELETED_AT)),
        is_deadstock: cell(columns::IS_DEADSTOCK) == "TRUE",
    }
}

/// Converts the raw sheet values into records. Row 0 is the header and is
/// always skipped, as are fully blank rows left behind by manual edits.
#[must_use]
pub fn transform_raw_rows(raw: &[Vec<String>]) -> Vec<ProductRecord> {
    raw.iter()
        .skip(1)
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| from_row(row))
        .collect()
}

/// Index of the row whose id column equals `id`, skipping the header.
#[must_use]
pub fn find_row_index(raw: &[Vec<String>], id: &str) -> Option<usize> {
    raw.iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| row.get(columns::ID).is_some_and(|cell| cell == id))
        .map(|(idx, _)| idx)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
