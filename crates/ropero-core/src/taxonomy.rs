//! Static clothing taxonomy: types, categories, measurement kinds, statuses,
//! conditions and sizes, each with a stable stored value and a display label.
//!
//! Stored rows in the sheet carry the raw values as strings, so the lookup
//! functions here take `&str` and fall back to the input when a value is not
//! in the table.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name an entry of a taxonomy table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {table} value: '{value}'")]
pub struct UnknownValue {
    pub table: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Upper,
    Lower,
    Complete,
}

impl Category {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Upper => "upper",
            Category::Lower => "lower",
            Category::Complete => "complete",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A garment measurement kind, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measurement {
    Shoulder,
    Chest,
    Waist,
    Hip,
    Rise,
    Leg,
    Length,
}

impl Measurement {
    pub const ALL: [Measurement; 7] = [
        Measurement::Shoulder,
        Measurement::Chest,
        Measurement::Waist,
        Measurement::Hip,
        Measurement::Rise,
        Measurement::Leg,
        Measurement::Length,
    ];

    /// Order used by the listing description. Leg comes before rise here,
    /// unlike [`Measurement::ALL`].
    pub const DESCRIPTION_ORDER: [Measurement; 7] = [
        Measurement::Shoulder,
        Measurement::Chest,
        Measurement::Waist,
        Measurement::Hip,
        Measurement::Leg,
        Measurement::Rise,
        Measurement::Length,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Measurement::Shoulder => "shoulder",
            Measurement::Chest => "chest",
            Measurement::Waist => "waist",
            Measurement::Hip => "hip",
            Measurement::Rise => "rise",
            Measurement::Leg => "leg",
            Measurement::Length => "length",
        }
    }

    /// Name of the record/form field that carries this measurement.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Measurement::Shoulder => "size_shoulder",
            Measurement::Chest => "size_chest",
            Measurement::Waist => "size_waist",
            Measurement::Hip => "size_hip",
            Measurement::Rise => "size_rise",
            Measurement::Leg => "size_leg",
            Measurement::Length => "size_length",
        }
    }

    /// Label used in the listing description.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Measurement::Shoulder => "Hombro a hombro",
            Measurement::Chest => "Pecho",
            Measurement::Waist => "Cintura",
            Measurement::Hip => "Cadera",
            Measurement::Rise => "Tiro",
            Measurement::Leg => "Pierna",
            Measurement::Length => "Largo",
        }
    }

    /// Whether users enter this measurement as a half (garment laid flat)
    /// and the stored value is doubled.
    #[must_use]
    pub fn is_doubled(self) -> bool {
        matches!(
            self,
            Measurement::Chest | Measurement::Waist | Measurement::Hip | Measurement::Leg
        )
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClothingType {
    Shirt,
    Vest,
    Top,
    Sweater,
    Jacket,
    TrenchCoat,
    Jean,
    Pant,
    Skirt,
    Short,
    Set,
    Overall,
    Dress,
    Bodysuit,
}

/// One row of the clothing type table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClothingTypeInfo {
    pub label: &'static str,
    pub value: ClothingType,
    pub category: Category,
    pub measurements: &'static [Measurement],
}

const UPPER_MEASUREMENTS: &[Measurement] = &[
    Measurement::Shoulder,
    Measurement::Chest,
    Measurement::Length,
];
const LOWER_MEASUREMENTS: &[Measurement] = &[
    Measurement::Waist,
    Measurement::Hip,
    Measurement::Rise,
    Measurement::Leg,
    Measurement::Length,
];
const SKIRT_MEASUREMENTS: &[Measurement] =
    &[Measurement::Waist, Measurement::Hip, Measurement::Length];
const DRESS_MEASUREMENTS: &[Measurement] = &[
    Measurement::Shoulder,
    Measurement::Chest,
    Measurement::Waist,
    Measurement::Hip,
    Measurement::Length,
];

/// Clothing types in [`ClothingType`] declaration order.
pub static CLOTHING_TYPES: &[ClothingTypeInfo; 14] = &[
    // Upper body
    ClothingTypeInfo {
        label: "Camisa",
        value: ClothingType::Shirt,
        category: Category::Upper,
        measurements: UPPER_MEASUREMENTS,
    },
    ClothingTypeInfo {
        label: "Chaleco",
        value: ClothingType::Vest,
        category: Category::Upper,
        measurements: UPPER_MEASUREMENTS,
    },
    ClothingTypeInfo {
        label: "Top",
        value: ClothingType::Top,
        category: Category::Upper,
        measurements: UPPER_MEASUREMENTS,
    },
    ClothingTypeInfo {
        label: "Jersey",
        value: ClothingType::Sweater,
        category: Category::Upper,
        measurements: UPPER_MEASUREMENTS,
    },
    ClothingTypeInfo {
        label: "Chaqueta",
        value: ClothingType::Jacket,
        category: Category::Upper,
        measurements: UPPER_MEASUREMENTS,
    },
    ClothingTypeInfo {
        label: "Gabardina",
        value: ClothingType::TrenchCoat,
        category: Category::Upper,
        measurements: UPPER_MEASUREMENTS,
    },
    // Lower body
    ClothingTypeInfo {
        label: "Jean",
        value: ClothingType::Jean,
        category: Category::Lower,
        measurements: LOWER_MEASUREMENTS,
    },
    ClothingTypeInfo {
        label: "Pantalón",
        value: ClothingType::Pant,
        category: Category::Lower,
        measurements: LOWER_MEASUREMENTS,
    },
    ClothingTypeInfo {
        label: "Falda",
        value: ClothingType::Skirt,
        category: Category::Lower,
        measurements: SKIRT_MEASUREMENTS,
    },
    ClothingTypeInfo {
        label: "Short",
        value: ClothingType::Short,
        category: Category::Lower,
        measurements: LOWER_MEASUREMENTS,
    },
    // Complete garments
    ClothingTypeInfo {
        label: "Set",
        value: ClothingType::Set,
        category: Category::Complete,
        measurements: &Measurement::ALL,
    },
    ClothingTypeInfo {
        label: "Mono",
        value: ClothingType::Overall,
        category: Category::Complete,
        measurements: &Measurement::ALL,
    },
    ClothingTypeInfo {
        label: "Vestido",
        value: ClothingType::Dress,
        category: Category::Complete,
        measurements: DRESS_MEASUREMENTS,
    },
    ClothingTypeInfo {
        label: "Body",
        value: ClothingType::Bodysuit,
        category: Category::Complete,
        measurements: &[],
    },
];

static TYPES_BY_VALUE: LazyLock<HashMap<&'static str, &'static ClothingTypeInfo>> =
    LazyLock::new(|| {
        CLOTHING_TYPES
            .iter()
            .map(|info| (info.value.as_str(), info))
            .collect()
    });

impl ClothingType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ClothingType::Shirt => "shirt",
            ClothingType::Vest => "vest",
            ClothingType::Top => "top",
            ClothingType::Sweater => "sweater",
            ClothingType::Jacket => "jacket",
            ClothingType::TrenchCoat => "trench-coat",
            ClothingType::Jean => "jean",
            ClothingType::Pant => "pant",
            ClothingType::Skirt => "skirt",
            ClothingType::Short => "short",
            ClothingType::Set => "set",
            ClothingType::Overall => "overall",
            ClothingType::Dress => "dress",
            ClothingType::Bodysuit => "bodysuit",
        }
    }

    #[must_use]
    pub fn info(self) -> &'static ClothingTypeInfo {
        &CLOTHING_TYPES[self as usize]
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        self.info().label
    }

    #[must_use]
    pub fn category(self) -> Category {
        self.info().category
    }

    #[must_use]
    pub fn measurements(self) -> &'static [Measurement] {
        self.info().measurements
    }
}

impl fmt::Display for ClothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClothingType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TYPES_BY_VALUE
            .get(s)
            .map(|info| info.value)
            .ok_or_else(|| UnknownValue {
                table: "clothing type",
                value: s.to_string(),
            })
    }
}

/// A `{ value, label }` row of the status, condition and size tables.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Labeled<T: 'static> {
    pub label: &'static str,
    pub value: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    NewWithLabel,
    NewWithoutLabel,
    Used,
}

pub const STATUSES: &[Labeled<ProductStatus>] = &[
    Labeled {
        label: "Nuevo con etiqueta",
        value: ProductStatus::NewWithLabel,
    },
    Labeled {
        label: "Nuevo sin etiqueta",
        value: ProductStatus::NewWithoutLabel,
    },
    Labeled {
        label: "Usado",
        value: ProductStatus::Used,
    },
];

impl ProductStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::NewWithLabel => "new-with-label",
            ProductStatus::NewWithoutLabel => "new-without-label",
            ProductStatus::Used => "used",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProductStatus::NewWithLabel => "Nuevo con etiqueta",
            ProductStatus::NewWithoutLabel => "Nuevo sin etiqueta",
            ProductStatus::Used => "Usado",
        }
    }

    #[must_use]
    pub fn is_new(self) -> bool {
        matches!(
            self,
            ProductStatus::NewWithLabel | ProductStatus::NewWithoutLabel
        )
    }
}

impl FromStr for ProductStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_value(STATUSES, s, ProductStatus::as_str).ok_or_else(|| UnknownValue {
            table: "status",
            value: s.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCondition {
    Perfect,
    VeryGood,
    Good,
}

pub const CONDITIONS: &[Labeled<ProductCondition>] = &[
    Labeled {
        label: "Perfecto estado",
        value: ProductCondition::Perfect,
    },
    Labeled {
        label: "Muy buen estado",
        value: ProductCondition::VeryGood,
    },
    Labeled {
        label: "Buen estado",
        value: ProductCondition::Good,
    },
];

impl ProductCondition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductCondition::Perfect => "perfect",
            ProductCondition::VeryGood => "very-good",
            ProductCondition::Good => "good",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProductCondition::Perfect => "Perfecto estado",
            ProductCondition::VeryGood => "Muy buen estado",
            ProductCondition::Good => "Buen estado",
        }
    }
}

impl FromStr for ProductCondition {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_value(CONDITIONS, s, ProductCondition::as_str).ok_or_else(|| UnknownValue {
            table: "condition",
            value: s.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSize {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

pub const SIZES: &[Labeled<ProductSize>] = &[
    Labeled {
        label: "XS",
        value: ProductSize::Xs,
    },
    Labeled {
        label: "S",
        value: ProductSize::S,
    },
    Labeled {
        label: "M",
        value: ProductSize::M,
    },
    Labeled {
        label: "L",
        value: ProductSize::L,
    },
    Labeled {
        label: "XL",
        value: ProductSize::Xl,
    },
    Labeled {
        label: "XXL",
        value: ProductSize::Xxl,
    },
];

impl ProductSize {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductSize::Xs => "xs",
            ProductSize::S => "s",
            ProductSize::M => "m",
            ProductSize::L => "l",
            ProductSize::Xl => "xl",
            ProductSize::Xxl => "xxl",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProductSize::Xs => "XS",
            ProductSize::S => "S",
            ProductSize::M => "M",
            ProductSize::L => "L",
            ProductSize::Xl => "XL",
            ProductSize::Xxl => "XXL",
        }
    }
}

impl FromStr for ProductSize {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_value(SIZES, s, ProductSize::as_str).ok_or_else(|| UnknownValue {
            table: "size",
            value: s.to_string(),
        })
    }
}

fn find_value<T: Copy>(table: &[Labeled<T>], s: &str, as_str: fn(T) -> &'static str) -> Option<T> {
    table
        .iter()
        .map(|row| row.value)
        .find(|value| as_str(*value) == s)
}

fn find_label<T: Copy>(
    table: &[Labeled<T>],
    s: &str,
    as_str: fn(T) -> &'static str,
) -> Option<&'static str> {
    table
        .iter()
        .find(|row| as_str(row.value) == s)
        .map(|row| row.label)
}

// ---------------------------------------------------------------------------
// Lookups over stored values
// ---------------------------------------------------------------------------

/// Label of a stored clothing type value, or the value itself if unknown.
#[must_use]
pub fn type_label(value: &str) -> &str {
    TYPES_BY_VALUE.get(value).map_or(value, |info| info.label)
}

/// Label of a stored status value, or the value itself if unknown.
#[must_use]
pub fn status_label(value: &str) -> &str {
    find_label(STATUSES, value, ProductStatus::as_str).unwrap_or(value)
}

/// Label of a stored condition value, or the value itself if unknown.
#[must_use]
pub fn condition_label(value: &str) -> &str {
    find_label(CONDITIONS, value, ProductCondition::as_str).unwrap_or(value)
}

/// Label of a stored size value, or the value itself if unknown.
#[must_use]
pub fn size_label(value: &str) -> &str {
    find_label(SIZES, value, ProductSize::as_str).unwrap_or(value)
}

/// Measurements a clothing type requires. Unknown types require none.
#[must_use]
pub fn required_measurements(type_value: &str) -> &'static [Measurement] {
    TYPES_BY_VALUE
        .get(type_value)
        .map_or(&[], |info| info.measurements)
}

#[must_use]
pub fn is_measurement_required(type_value: &str, kind: Measurement) -> bool {
    required_measurements(type_value).contains(&kind)
}

/// Whether a stored status value denotes a new garment.
#[must_use]
pub fn is_new(status_value: &str) -> bool {
    status_value
        .parse::<ProductStatus>()
        .is_ok_and(ProductStatus::is_new)
}

/// Clothing types belonging to `category`, in table order.
#[must_use]
pub fn types_in_category(category: Category) -> Vec<&'static ClothingTypeInfo> {
    CLOTHING_TYPES
        .iter()
        .filter(|info| info.category == category)
        .collect()
}

#[cfg(test)]
#[path = "taxonomy_test.rs"]
mod tests;
