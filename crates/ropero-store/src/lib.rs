pub mod cache;
pub mod error;
pub mod google;
pub mod memory;
pub mod service;
pub mod sheet;

pub use cache::TagCache;
pub use error::StoreError;
pub use google::{Credentials, GoogleSheetsClient};
pub use memory::MemorySheetStore;
pub use service::{CatalogError, ProductService, PRODUCTS_TAG};
pub use sheet::{ProductSheet, Rows, SheetStore};
