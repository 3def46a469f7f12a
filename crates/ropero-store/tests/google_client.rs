//! Integration tests for `GoogleSheetsClient`.
//!
//! Each test stands up a `wiremock` server in place of both the Sheets API
//! and the OAuth token endpoint, so no real network traffic is made.

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ropero_store::{Credentials, GoogleSheetsClient, SheetStore, StoreError};

const TEST_KEY: &str = include_str!("fixtures/service_account_key.pem");

fn static_client(server: &MockServer) -> GoogleSheetsClient {
    GoogleSheetsClient::new(
        &server.uri(),
        "sheet-1",
        Credentials::StaticToken("test-token".to_string()),
        5,
    )
    .expect("failed to build test GoogleSheetsClient")
}

fn service_account_client(server: &MockServer) -> GoogleSheetsClient {
    GoogleSheetsClient::new(
        &server.uri(),
        "sheet-1",
        Credentials::ServiceAccount {
            client_email: "bot@ropero-test.iam.gserviceaccount.com".to_string(),
            private_key: TEST_KEY.to_string(),
            token_url: format!("{}/token", server.uri()),
        },
        5,
    )
    .expect("failed to build test GoogleSheetsClient")
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_returns_rows_as_strings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/products%21A1%3AT"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "products!A1:T3",
            "majorDimension": "ROWS",
            "values": [["id", "name", "price"], ["a", "Camisa", 25], []]
        })))
        .mount(&server)
        .await;

    let rows = static_client(&server).get("products!A1:T").await;

    assert!(rows.is_ok(), "expected Ok, got: {rows:?}");
    let rows = rows.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], vec!["a", "Camisa", "25"]);
    assert!(rows[2].is_empty());
}

#[tokio::test]
async fn get_of_empty_range_returns_no_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/co-products%21A1%3AT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "co-products!A1:T1000",
            "majorDimension": "ROWS"
        })))
        .mount(&server)
        .await;

    let rows = static_client(&server).get("co-products!A1:T").await.unwrap();
    assert!(rows.is_empty());
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn append_posts_raw_values() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1/values/products%21A1%3AT:append"))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_json(json!({"values": [["id-1", "Camisa de lino"]]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updates": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let result = static_client(&server)
        .append(
            "products!A1:T",
            vec![vec!["id-1".to_string(), "Camisa de lino".to_string()]],
        )
        .await;

    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn update_puts_single_row_range() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-1/values/products%21A3%3AT3"))
        .and(query_param("valueInputOption", "RAW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updatedRows": 1})))
        .expect(1)
        .mount(&server)
        .await;

    static_client(&server)
        .update("products!A3:T3", vec![vec!["b".to_string()]])
        .await
        .expect("update should succeed");
}

#[tokio::test]
async fn clear_posts_to_clear_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1/values/products%21A2%3AT:clear"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clearedRange": "products!A2:T1000"
        })))
        .expect(1)
        .mount(&server)
        .await;

    static_client(&server)
        .clear("products!A2:T")
        .await
        .expect("clear should succeed");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_maps_to_not_found_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = static_client(&server).get("missing!A1:T").await.unwrap_err();
    assert!(
        matches!(err, StoreError::NotFound { ref url } if url.contains("missing%21A1%3AT")),
        "expected NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = static_client(&server)
        .append("products!A1:T", vec![vec!["x".to_string()]])
        .await
        .unwrap_err();
    assert!(
        matches!(err, StoreError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
}

#[tokio::test]
async fn invalid_json_maps_to_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = static_client(&server).get("products!A1:T").await.unwrap_err();
    assert!(
        matches!(err, StoreError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Service account tokens
// ---------------------------------------------------------------------------

#[tokio::test]
async fn service_account_token_is_exchanged_once_and_reused() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.issued",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/products%21A1%3AT"))
        .and(header("authorization", "Bearer ya29.issued"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"values": [["id"]]})))
        .expect(2)
        .mount(&server)
        .await;

    let client = service_account_client(&server);
    for _ in 0..2 {
        let rows = client.get("products!A1:T").await.expect("get should succeed");
        assert_eq!(rows, vec![vec!["id".to_string()]]);
    }
}

#[tokio::test]
async fn short_lived_token_is_refreshed() {
    let server = MockServer::start().await;

    // Shorter than the refresh margin, so every call exchanges again.
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.brief",
            "expires_in": 30
        })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1/values/products%21A2%3AT:clear"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let client = service_account_client(&server);
    client.clear("products!A2:T").await.unwrap();
    client.clear("products!A2:T").await.unwrap();
}

#[tokio::test]
async fn rejected_token_exchange_surfaces_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;

    let err = service_account_client(&server)
        .get("products!A1:T")
        .await
        .unwrap_err();
    assert!(
        matches!(err, StoreError::TokenExchange { ref reason, .. } if reason.contains("invalid_grant")),
        "expected TokenExchange, got: {err:?}"
    );
}

#[tokio::test]
async fn malformed_private_key_fails_to_sign() {
    let server = MockServer::start().await;
    let client = GoogleSheetsClient::new(
        &server.uri(),
        "sheet-1",
        Credentials::ServiceAccount {
            client_email: "bot@ropero-test.iam.gserviceaccount.com".to_string(),
            private_key: "not a key".to_string(),
            token_url: format!("{}/token", server.uri()),
        },
        5,
    )
    .unwrap();

    let err = client.get("products!A1:T").await.unwrap_err();
    assert!(matches!(err, StoreError::Signing(_)), "got: {err:?}");
}
