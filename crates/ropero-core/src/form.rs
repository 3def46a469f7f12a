//! Submitted product form: lenient parsing, validation into [`ProductInput`],
//! and the name/type event transitions the form editor applies.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inference::infer_type;
use crate::product::{Measurements, ProductInput};
use crate::taxonomy::{ClothingType, Measurement, ProductCondition, ProductSize, ProductStatus};

const MIN_NAME_CHARS: usize = 5;
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
const MAX_MEASUREMENT_CM: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// A numeric form field as browsers post it: a JSON number or a string that
/// may be empty.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(serde_json::Number),
    Text(String),
}

impl FormValue {
    /// Parses the value. Empty text is `Ok(None)`, unparseable text is `Err`.
    fn to_decimal(&self) -> Result<Option<Decimal>, ()> {
        let raw = match self {
            FormValue::Number(n) => n.to_string(),
            FormValue::Text(s) if s.trim().is_empty() => return Ok(None),
            FormValue::Text(s) => s.trim().to_string(),
        };
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map(|d| Some(d.normalize()))
            .map_err(|_| ())
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

/// The add/update product form as submitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub price: Option<FormValue>,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub size: String,
    #[serde(default, alias = "details")]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub clothing_type: String,
    #[serde(default)]
    pub is_deadstock: bool,
    #[serde(default)]
    pub size_shoulder: Option<FormValue>,
    #[serde(default)]
    pub size_chest: Option<FormValue>,
    #[serde(default)]
    pub size_waist: Option<FormValue>,
    #[serde(default)]
    pub size_hip: Option<FormValue>,
    #[serde(default)]
    pub size_rise: Option<FormValue>,
    #[serde(default)]
    pub size_leg: Option<FormValue>,
    #[serde(default)]
    pub size_length: Option<FormValue>,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// The submitted form failed validation. Carries every failing field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid product data")]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

impl ProductForm {
    fn measurement_value(&self, kind: Measurement) -> Option<&FormValue> {
        match kind {
            Measurement::Shoulder => self.size_shoulder.as_ref(),
            Measurement::Chest => self.size_chest.as_ref(),
            Measurement::Waist => self.size_waist.as_ref(),
            Measurement::Hip => self.size_hip.as_ref(),
            Measurement::Rise => self.size_rise.as_ref(),
            Measurement::Leg => self.size_leg.as_ref(),
            Measurement::Length => self.size_length.as_ref(),
        }
    }

    /// Validates the form into a typed [`ProductInput`].
    ///
    /// Measurements the selected type does not use are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every invalid field.
    pub fn validate(&self) -> Result<ProductInput, ValidationError> {
        let mut fields = Vec::new();
        let mut fail = |field: &'static str, message: &str| {
            fields.push(FieldError {
                field,
                message: message.to_string(),
            });
        };

        let name = self.name.trim().to_string();
        if name.chars().count() < MIN_NAME_CHARS {
            fail(
                "name",
                "El nombre del producto debe tener al menos 5 caracteres",
            );
        }

        let status = self.status.parse::<ProductStatus>().ok();
        if status.is_none() {
            fail("status", "Debes seleccionar un estado");
        }

        let condition = self.condition.parse::<ProductCondition>().ok();
        if condition.is_none() {
            fail("condition", "Debes seleccionar una condición");
        }

        let size = self.size.parse::<ProductSize>().ok();
        if size.is_none() {
            fail("size", "Debes seleccionar una talla");
        }

        let clothing_type = self.clothing_type.parse::<ClothingType>().ok();
        if clothing_type.is_none() {
            fail("type", "Debes seleccionar un tipo de prenda");
        }

        let price = match self.price.as_ref().map(FormValue::to_decimal) {
            Some(Ok(Some(price))) if price > MAX_PRICE => {
                fail("price", "El precio del producto no puede superar €1000000");
                None
            }
            Some(Ok(Some(price))) if price > Decimal::ZERO => Some(price),
            _ => {
                fail("price", "El precio del producto debe ser mayor a 0");
                None
            }
        };

        let mut measurements = Measurements::default();
        for kind in Measurement::ALL {
            let parsed = match self.measurement_value(kind).map(FormValue::to_decimal) {
                None | Some(Ok(None)) => None,
                Some(Ok(Some(value))) if value > MAX_MEASUREMENT_CM => {
                    fail(kind.field_name(), "La medida no puede superar 1000 cm");
                    None
                }
                Some(Ok(Some(value))) if value >= Decimal::ZERO => Some(value),
                Some(_) => {
                    fail(kind.field_name(), "La medida debe ser un número positivo");
                    None
                }
            };
            let applies = clothing_type.is_some_and(|t| t.measurements().contains(&kind));
            if applies {
                measurements.set(kind, parsed);
            }
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned);

        match (status, condition, size, clothing_type, price) {
            (Some(status), Some(condition), Some(size), Some(clothing_type), Some(price))
                if fields.is_empty() =>
            {
                Ok(ProductInput {
                    name,
                    status,
                    price,
                    condition,
                    size,
                    description,
                    clothing_type,
                    is_deadstock: self.is_deadstock,
                    measurements,
                })
            }
            _ => Err(ValidationError { fields }),
        }
    }
}

/// Editor state for the product form.
///
/// Changing the name may select a type; changing the type clears every
/// measurement. An explicit [`FormState::type_changed`] after a name change
/// overrides the inferred type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub clothing_type: ClothingType,
    pub measurements: Measurements,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            name: String::new(),
            clothing_type: ClothingType::Shirt,
            measurements: Measurements::default(),
        }
    }
}

impl FormState {
    /// Applies a name edit, inferring the type from it when possible.
    pub fn name_changed(&mut self, name: &str) {
        name.clone_into(&mut self.name);
        if let Some(inferred) = infer_type(name) {
            self.type_changed(inferred);
        }
    }

    /// Applies a type selection. Measurements are cleared only when the type
    /// actually changes.
    pub fn type_changed(&mut self, clothing_type: ClothingType) {
        if self.clothing_type != clothing_type {
            self.clothing_type = clothing_type;
            self.measurements = Measurements::default();
        }
    }

    pub fn measurement_changed(&mut self, kind: Measurement, value: Option<Decimal>) {
        self.measurements.set(kind, value);
    }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
