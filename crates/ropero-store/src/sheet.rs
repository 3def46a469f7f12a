//! Range-addressed access to a spreadsheet and the product sheet layout.

use std::sync::Arc;

use async_trait::async_trait;
use ropero_core::Role;

use crate::error::StoreError;

/// Grid of cell values, outer vector is rows.
pub type Rows = Vec<Vec<String>>;

/// A spreadsheet addressed by A1 ranges such as `products!A1:T`.
///
/// Every call is a single request. Nothing is retried.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Returns the rows in `range`. An empty range yields an empty vector.
    async fn get(&self, range: &str) -> Result<Rows, StoreError>;

    /// Appends `rows` after the last non-empty row of the table at `range`.
    async fn append(&self, range: &str, rows: Rows) -> Result<(), StoreError>;

    /// Overwrites the cells at `range` with `rows`.
    async fn update(&self, range: &str, rows: Rows) -> Result<(), StoreError>;

    /// Blanks every cell in `range`.
    async fn clear(&self, range: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: SheetStore + ?Sized> SheetStore for Arc<S> {
    async fn get(&self, range: &str) -> Result<Rows, StoreError> {
        (**self).get(range).await
    }

    async fn append(&self, range: &str, rows: Rows) -> Result<(), StoreError> {
        (**self).append(range, rows).await
    }

    async fn update(&self, range: &str, rows: Rows) -> Result<(), StoreError> {
        (**self).update(range, rows).await
    }

    async fn clear(&self, range: &str) -> Result<(), StoreError> {
        (**self).clear(range).await
    }
}

/// The two product tables kept in the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductSheet {
    Products,
    CoProducts,
}

impl ProductSheet {
    /// `col` staff work on their own table; everyone else shares `products`.
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Col => ProductSheet::CoProducts,
            Role::Admin | Role::Eu => ProductSheet::Products,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ProductSheet::Products => "products",
            ProductSheet::CoProducts => "co-products",
        }
    }

    /// Header plus data, used for reads and appends.
    #[must_use]
    pub fn table_range(self) -> String {
        format!("{}!A1:T", self.name())
    }

    /// Everything below the header row.
    #[must_use]
    pub fn data_range(self) -> String {
        format!("{}!A2:T", self.name())
    }

    /// One full row, `row_number` is 1-based as in the sheet UI.
    #[must_use]
    pub fn row_range(self, row_number: usize) -> String {
        format!("{name}!A{row_number}:T{row_number}", name = self.name())
    }
}

impl std::fmt::Display for ProductSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
