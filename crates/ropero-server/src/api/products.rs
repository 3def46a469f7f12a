use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use ropero_core::{create_product_description, ProductForm, ProductRecord};
use ropero_store::ProductSheet;
use serde::Serialize;

use crate::middleware::{CurrentUser, RequestId};

use super::{map_catalog_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    #[serde(flatten)]
    record: ProductRecord,
    listing_description: String,
}

impl From<ProductRecord> for ProductItem {
    fn from(record: ProductRecord) -> Self {
        let listing_description = create_product_description(&record);
        Self {
            record,
            listing_description,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    sheet: &'static str,
}

fn parse_form(req_id: &RequestId, body: Result<Json<ProductForm>, JsonRejection>) -> Result<ProductForm, ApiError> {
    body.map(|Json(form)| form).map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })
}

pub(super) async fn get_sheet_rows(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<Vec<String>>>>, ApiError> {
    let rows = state
        .catalog
        .raw_rows(user.role)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), e))?;
    Ok(Json(ApiResponse::new(rows, req_id.0)))
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let records = state
        .catalog
        .list_products(user.role)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), e))?;
    let data = records.into_iter().map(ProductItem::from).collect();
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    body: Result<Json<ProductForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ProductItem>>), ApiError> {
    let form = parse_form(&req_id, body)?;
    let record = state
        .catalog
        .add_product(&form, ProductSheet::for_role(user.role))
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), e))?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(ProductItem::from(record), req_id.0)),
    ))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    body: Result<Json<ProductForm>, JsonRejection>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let form = parse_form(&req_id, body)?;
    let current_rows = state
        .catalog
        .raw_rows(user.role)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), e))?;
    let record = state
        .catalog
        .update_product(&id, &form, &current_rows, ProductSheet::for_role(user.role))
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), e))?;
    Ok(Json(ApiResponse::new(ProductItem::from(record), req_id.0)))
}

pub(super) async fn delete_all_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let sheet = ProductSheet::for_role(user.role);
    state
        .catalog
        .delete_all_products(sheet)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), e))?;
    tracing::warn!(username = %user.username, sheet = %sheet, "product sheet cleared");
    Ok(Json(ApiResponse::new(
        DeletedData {
            sheet: sheet.name(),
        },
        req_id.0,
    )))
}

pub(super) async fn get_product_description(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .catalog
        .find_product(user.role, &id)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), e))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        create_product_description(&record),
    ))
}
