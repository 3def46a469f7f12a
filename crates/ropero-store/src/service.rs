//! Product catalog operations over a [`SheetStore`].

use std::sync::Arc;

use chrono::Utc;
use ropero_core::form::{ProductForm, ValidationError};
use ropero_core::transform::{columns, find_row_index, from_row, to_row};
use ropero_core::{transform_before_write, transform_raw_rows, ProductRecord, Role};
use thiserror::Error;
use uuid::Uuid;

use crate::cache::TagCache;
use crate::error::StoreError;
use crate::sheet::{ProductSheet, Rows, SheetStore};

/// Cache tag invalidated after every write.
pub const PRODUCTS_TAG: &str = "products";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("product {id} not found")]
    NotFound { id: String },

    #[error("no rows supplied to locate product {id}")]
    NoRows { id: String },

    #[error("spreadsheet error: {0}")]
    Store(#[from] StoreError),
}

/// Reads and writes product rows, with a role-keyed read cache.
pub struct ProductService<S: ?Sized = dyn SheetStore> {
    store: Arc<S>,
    cache: TagCache,
}

impl<S: SheetStore + ?Sized> ProductService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            cache: TagCache::new(),
        }
    }

    /// Raw sheet values for the caller's table, header row included.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the read fails.
    pub async fn raw_rows(&self, role: Role) -> Result<Rows, CatalogError> {
        let sheet = ProductSheet::for_role(role);
        let key = format!("sheet-products:{role}");
        let rows = self
            .cache
            .get_or_fetch(PRODUCTS_TAG, &key, || async {
                tracing::debug!(sheet = %sheet, "reading product sheet");
                self.store.get(&sheet.table_range()).await
            })
            .await?;
        Ok(rows)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the read fails.
    pub async fn list_products(&self, role: Role) -> Result<Vec<ProductRecord>, CatalogError> {
        let raw = self.raw_rows(role).await?;
        Ok(transform_raw_rows(&raw))
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no row carries `id`, or
    /// [`CatalogError::Store`] if the read fails.
    pub async fn find_product(&self, role: Role, id: &str) -> Result<ProductRecord, CatalogError> {
        let raw = self.raw_rows(role).await?;
        find_row_index(&raw, id)
            .map(|idx| from_row(&raw[idx]))
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    /// Validates `form` and appends it as a new row with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for invalid input (nothing is
    /// written), or [`CatalogError::Store`] if the append fails.
    pub async fn add_product(
        &self,
        form: &ProductForm,
        sheet: ProductSheet,
    ) -> Result<ProductRecord, CatalogError> {
        let input = transform_before_write(&form.validate()?);
        let record = ProductRecord::from_input(Uuid::new_v4().to_string(), &input, Utc::now());

        self.store
            .append(&sheet.table_range(), vec![to_row(&record)])
            .await?;
        self.cache.invalidate(PRODUCTS_TAG).await;

        tracing::info!(product_id = %record.id, sheet = %sheet, "product added");
        Ok(record)
    }

    /// Overwrites the row of product `id`, located in `current_rows`
    /// (as returned by [`Self::raw_rows`], header first).
    ///
    /// `id`, `created_at`, `archive_at` and `deleted_at` are carried over from
    /// the stored row; `updated_at` is set to now.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] for invalid input.
    /// - [`CatalogError::NoRows`] if `current_rows` is empty.
    /// - [`CatalogError::NotFound`] if no row carries `id`.
    /// - [`CatalogError::Store`] if the update fails.
    ///
    /// Nothing is written in the first three cases.
    pub async fn update_product(
        &self,
        id: &str,
        form: &ProductForm,
        current_rows: &[Vec<String>],
        sheet: ProductSheet,
    ) -> Result<ProductRecord, CatalogError> {
        let input = form.validate()?;
        if current_rows.is_empty() {
            return Err(CatalogError::NoRows { id: id.to_string() });
        }
        let row_idx = find_row_index(current_rows, id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;
        let existing_row = &current_rows[row_idx];
        let existing = from_row(existing_row);

        let input = transform_before_write(&input);
        let now = Utc::now();
        let mut record = ProductRecord::from_input(existing.id, &input, now);
        record.created_at = existing.created_at;
        record.archive_at = existing.archive_at;
        record.deleted_at = existing.deleted_at;
        record.updated_at = Some(now);

        let mut row = to_row(&record);
        // Stored dates are written back as-is, even if they do not parse.
        for column in [columns::CREATED_AT, columns::ARCHIVE_AT, columns::DELETED_AT] {
            row[column] = existing_row.get(column).cloned().unwrap_or_default();
        }

        // Row 0 of current_rows is sheet row 1.
        let range = sheet.row_range(row_idx + 1);
        self.store.update(&range, vec![row]).await?;
        self.cache.invalidate(PRODUCTS_TAG).await;

        tracing::info!(product_id = %record.id, range = %range, "product updated");
        Ok(record)
    }

    /// Clears every row below the header. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the clear fails.
    pub async fn delete_all_products(&self, sheet: ProductSheet) -> Result<(), CatalogError> {
        self.store.clear(&sheet.data_range()).await?;
        self.cache.invalidate(PRODUCTS_TAG).await;
        tracing::warn!(sheet = %sheet, "all products deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
