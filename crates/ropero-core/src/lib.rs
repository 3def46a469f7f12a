pub mod app_config;
pub mod config;
pub mod description;
pub mod form;
pub mod inference;
pub mod product;
pub mod taxonomy;
pub mod transform;
pub mod users;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, SheetsConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use description::create_product_description;
pub use form::{FieldError, FormState, FormValue, ProductForm, ValidationError};
pub use inference::infer_type;
pub use product::{format_price, format_size, Measurements, ProductInput, ProductRecord};
pub use taxonomy::{
    ClothingType, Measurement, ProductCondition, ProductSize, ProductStatus, CLOTHING_TYPES,
};
pub use transform::{header_row, transform_before_write, transform_raw_rows};
pub use users::{parse_allowed_users, AllowedUser, Role, UserProfile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
