use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ropero_core::header_row;
use rust_decimal::Decimal;
use serde_json::json;

use super::*;
use crate::memory::MemorySheetStore;

fn form(value: serde_json::Value) -> ProductForm {
    serde_json::from_value(value).expect("form should deserialize")
}

fn shirt_form() -> ProductForm {
    form(json!({
        "name": "Camisa de lino",
        "status": "used",
        "price": "25",
        "condition": "good",
        "size": "m",
        "type": "shirt",
        "size_shoulder": "42",
        "size_chest": "50",
        "size_length": "70"
    }))
}

fn seeded_store() -> Arc<MemorySheetStore> {
    Arc::new(MemorySheetStore::with_sheet("products", vec![header_row()]))
}

/// Counts reads and writes, optionally failing every call.
#[derive(Default)]
struct CountingStore {
    inner: MemorySheetStore,
    gets: AtomicUsize,
    writes: AtomicUsize,
    fail: bool,
}

impl CountingStore {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            Err(StoreError::UnexpectedStatus {
                status: 500,
                url: "memory://products".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SheetStore for CountingStore {
    async fn get(&self, range: &str) -> Result<Rows, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get(range).await
    }

    async fn append(&self, range: &str, rows: Rows) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.append(range, rows).await
    }

    async fn update(&self, range: &str, rows: Rows) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.update(range, rows).await
    }

    async fn clear(&self, range: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.clear(range).await
    }
}

#[tokio::test]
async fn add_product_appends_transformed_row() {
    let store = seeded_store();
    let service = ProductService::new(Arc::clone(&store));

    let record = service
        .add_product(&shirt_form(), ProductSheet::Products)
        .await
        .expect("add should succeed");

    assert!(Uuid::parse_str(&record.id).is_ok());
    assert!(record.created_at.is_some());
    assert_eq!(record.measurements.chest, Some(Decimal::from(100)));
    assert_eq!(record.measurements.shoulder, Some(Decimal::from(42)));

    let rows = store.sheet_rows("products").await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][columns::ID], record.id);
    assert_eq!(rows[1][columns::SIZE_CHEST], "100");
    assert_eq!(rows[1][columns::IS_DEADSTOCK], "FALSE");
}

#[tokio::test]
async fn invalid_form_is_rejected_without_write() {
    let store = Arc::new(CountingStore::default());
    let service = ProductService::new(Arc::clone(&store));

    let err = service
        .add_product(&form(json!({"name": "abc"})), ProductSheet::Products)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Validation(_)));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn list_products_reads_new_rows_after_write() {
    let store = seeded_store();
    let service = ProductService::new(Arc::clone(&store));

    assert!(service.list_products(Role::Admin).await.unwrap().is_empty());
    service
        .add_product(&shirt_form(), ProductSheet::Products)
        .await
        .unwrap();

    let products = service.list_products(Role::Admin).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Camisa de lino");
}

#[tokio::test]
async fn reads_are_cached_per_role_until_a_write() {
    let store = Arc::new(CountingStore::default());
    store
        .inner
        .update("products!A1:T1", vec![header_row()])
        .await
        .unwrap();
    store
        .inner
        .update("co-products!A1:T1", vec![header_row()])
        .await
        .unwrap();
    let service = ProductService::new(Arc::clone(&store));

    service.raw_rows(Role::Admin).await.unwrap();
    service.raw_rows(Role::Admin).await.unwrap();
    assert_eq!(store.gets.load(Ordering::SeqCst), 1);

    service.raw_rows(Role::Col).await.unwrap();
    assert_eq!(store.gets.load(Ordering::SeqCst), 2);

    service
        .add_product(&shirt_form(), ProductSheet::CoProducts)
        .await
        .unwrap();
    service.raw_rows(Role::Admin).await.unwrap();
    assert_eq!(store.gets.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn col_role_reads_co_products_sheet() {
    let store = Arc::new(MemorySheetStore::with_sheet("products", vec![header_row()]));
    store
        .update("co-products!A1:T1", vec![header_row()])
        .await
        .unwrap();
    let service = ProductService::new(Arc::clone(&store));

    service
        .add_product(&shirt_form(), ProductSheet::for_role(Role::Col))
        .await
        .unwrap();

    assert_eq!(service.list_products(Role::Col).await.unwrap().len(), 1);
    assert!(service.list_products(Role::Eu).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_product_rewrites_row_and_preserves_identity() {
    let store = seeded_store();
    let service = ProductService::new(Arc::clone(&store));
    let added = service
        .add_product(&shirt_form(), ProductSheet::Products)
        .await
        .unwrap();
    let created_cell = store.sheet_rows("products").await[1][columns::CREATED_AT].clone();

    let current = service.raw_rows(Role::Admin).await.unwrap();
    let mut edited = shirt_form();
    edited.name = "Camisa de lino blanca".to_string();
    let updated = service
        .update_product(&added.id, &edited, &current, ProductSheet::Products)
        .await
        .expect("update should succeed");

    assert_eq!(updated.id, added.id);
    // The sheet keeps millisecond precision.
    assert_eq!(
        updated.created_at.map(|t| t.timestamp_millis()),
        added.created_at.map(|t| t.timestamp_millis())
    );
    assert!(updated.updated_at.is_some());

    let rows = store.sheet_rows("products").await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][columns::NAME], "Camisa de lino blanca");
    assert_eq!(rows[1][columns::CREATED_AT], created_cell);
    assert!(!rows[1][columns::UPDATED_AT].is_empty());
    // Doubling applies to the submitted half-measurement, not the stored value.
    assert_eq!(rows[1][columns::SIZE_CHEST], "100");
}

#[tokio::test]
async fn update_preserves_unparseable_date_cells() {
    let mut row = vec![String::new(); columns::COUNT];
    row[columns::ID] = "legacy-1".to_string();
    row[columns::CREATED_AT] = "15/01/2024".to_string();
    row[columns::ARCHIVE_AT] = "20/02/2024".to_string();
    row[columns::DELETED_AT] = "pendiente".to_string();
    let store = Arc::new(MemorySheetStore::with_sheet(
        "products",
        vec![header_row(), row],
    ));
    let service = ProductService::new(Arc::clone(&store));

    let current = service.raw_rows(Role::Eu).await.unwrap();
    service
        .update_product("legacy-1", &shirt_form(), &current, ProductSheet::Products)
        .await
        .unwrap();

    let rows = store.sheet_rows("products").await;
    assert_eq!(rows[1][columns::CREATED_AT], "15/01/2024");
    assert_eq!(rows[1][columns::ARCHIVE_AT], "20/02/2024");
    assert_eq!(rows[1][columns::DELETED_AT], "pendiente");
    assert!(!rows[1][columns::UPDATED_AT].is_empty());
}

#[tokio::test]
async fn update_unknown_id_is_not_found_and_writes_nothing() {
    let store = Arc::new(CountingStore::default());
    let service = ProductService::new(Arc::clone(&store));
    let current = vec![
        header_row(),
        vec!["a".to_string(), "Camisa uno".to_string()],
    ];

    let err = service
        .update_product("zzz", &shirt_form(), &current, ProductSheet::Products)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::NotFound { ref id } if id == "zzz"));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_with_no_rows_is_distinct_error() {
    let store = Arc::new(CountingStore::default());
    let service = ProductService::new(Arc::clone(&store));

    let err = service
        .update_product("a", &shirt_form(), &[], ProductSheet::Products)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::NoRows { .. }));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delete_all_leaves_only_header() {
    let store = seeded_store();
    let service = ProductService::new(Arc::clone(&store));
    for _ in 0..3 {
        service
            .add_product(&shirt_form(), ProductSheet::Products)
            .await
            .unwrap();
    }

    service
        .delete_all_products(ProductSheet::Products)
        .await
        .unwrap();

    let raw = store.get("products!A1:T").await.unwrap();
    assert_eq!(raw, vec![header_row()]);
    assert!(service.list_products(Role::Admin).await.unwrap().is_empty());
}

#[tokio::test]
async fn find_product_locates_by_id() {
    let store = seeded_store();
    let service = ProductService::new(Arc::clone(&store));
    let added = service
        .add_product(&shirt_form(), ProductSheet::Products)
        .await
        .unwrap();

    let found = service.find_product(Role::Admin, &added.id).await.unwrap();
    assert_eq!(found.name, "Camisa de lino");
    assert!(matches!(
        service.find_product(Role::Admin, "missing").await,
        Err(CatalogError::NotFound { .. })
    ));
}

#[tokio::test]
async fn store_failures_surface_as_store_errors() {
    let service = ProductService::new(Arc::new(CountingStore::failing()));

    assert!(matches!(
        service.list_products(Role::Admin).await,
        Err(CatalogError::Store(_))
    ));
    assert!(matches!(
        service.add_product(&shirt_form(), ProductSheet::Products).await,
        Err(CatalogError::Store(_))
    ));
    assert!(matches!(
        service.delete_all_products(ProductSheet::Products).await,
        Err(CatalogError::Store(_))
    ));
}

#[tokio::test]
async fn service_works_over_trait_objects() {
    let store: Arc<dyn SheetStore> = seeded_store();
    let service: ProductService = ProductService::new(store);
    service
        .add_product(&shirt_form(), ProductSheet::Products)
        .await
        .unwrap();
    assert_eq!(service.list_products(Role::Admin).await.unwrap().len(), 1);
}
