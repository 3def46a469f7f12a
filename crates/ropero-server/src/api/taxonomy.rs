use axum::{extract::Query, Extension, Json};
use ropero_core::taxonomy::{
    ClothingTypeInfo, Labeled, ProductCondition, ProductSize, ProductStatus, CONDITIONS, SIZES,
    STATUSES,
};
use ropero_core::{infer_type, ClothingType, CLOTHING_TYPES};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::ApiResponse;

#[derive(Debug, Serialize)]
pub(super) struct TaxonomyData {
    types: &'static [ClothingTypeInfo],
    statuses: &'static [Labeled<ProductStatus>],
    conditions: &'static [Labeled<ProductCondition>],
    sizes: &'static [Labeled<ProductSize>],
}

#[derive(Debug, Deserialize)]
pub(super) struct InferQuery {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize)]
pub(super) struct InferData {
    #[serde(rename = "type")]
    clothing_type: Option<ClothingType>,
}

pub(super) async fn get_taxonomy(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<TaxonomyData>> {
    Json(ApiResponse::new(
        TaxonomyData {
            types: CLOTHING_TYPES,
            statuses: STATUSES,
            conditions: CONDITIONS,
            sizes: SIZES,
        },
        req_id.0,
    ))
}

pub(super) async fn infer_clothing_type(
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<InferQuery>,
) -> Json<ApiResponse<InferData>> {
    Json(ApiResponse::new(
        InferData {
            clothing_type: infer_type(&query.name),
        },
        req_id.0,
    ))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::super::tests::{body_json, session_cookie, test_app};

    async fn get(uri: &str) -> serde_json::Value {
        let test = test_app();
        let response = test
            .app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::COOKIE, session_cookie(&test.auth, "ana", "secret"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn taxonomy_lists_all_tables() {
        let json = get("/api/v1/taxonomy").await;
        let types = json["data"]["types"].as_array().unwrap();
        assert_eq!(types.len(), 14);
        assert_eq!(types[0]["value"], "shirt");
        assert_eq!(types[0]["label"], "Camisa");
        assert_eq!(
            types[0]["measurements"],
            serde_json::json!(["shoulder", "chest", "length"])
        );
        assert_eq!(json["data"]["statuses"].as_array().unwrap().len(), 3);
        assert_eq!(json["data"]["sizes"][0]["value"], "xs");
    }

    #[tokio::test]
    async fn infer_returns_type_or_null() {
        let json = get("/api/v1/taxonomy/infer?name=Pantal%C3%B3n%20de%20pana").await;
        assert_eq!(json["data"]["type"], "pant");

        let json = get("/api/v1/taxonomy/infer?name=Bufanda").await;
        assert!(json["data"]["type"].is_null());
    }
}
