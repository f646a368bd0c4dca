use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::types::{PatientPage, PatientResponse};

/// Failures talking to the patient API that callers may want to tell apart.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed ({0}). Check your API key.")]
    Unauthorized(StatusCode),

    #[error("Patient API rate limit exceeded. Wait a moment and try again.")]
    RateLimited,

    #[error("Patient API returned HTTP {0}")]
    Status(StatusCode),

    #[error("Request to patient API timed out")]
    Timeout,

    #[error("Failed to reach patient API: {0}")]
    Request(#[source] reqwest::Error),
}

impl ApiError {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(status),
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
            _ => ApiError::Status(status),
        }
    }

    fn from_request(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Request(error)
        }
    }
}

/// Build `{base_url}/patients` with optional page and limit parameters.
pub fn patients_url(base_url: &str, page: Option<u32>, limit: Option<u32>) -> Result<Url> {
    let endpoint = format!("{}/patients", base_url.trim_end_matches('/'));

    let mut params = Vec::new();
    if let Some(page) = page {
        params.push(("page", page.to_string()));
    }
    if let Some(limit) = limit {
        params.push(("limit", limit.to_string()));
    }

    let mut url =
        Url::parse(&endpoint).with_context(|| format!("Invalid patient API URL: {}", endpoint))?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(&params);
    }
    Ok(url)
}

/// Fetch one page of patient records.
///
/// Issues a single request; page and limit are passed through unchanged.
pub async fn fetch_patients(
    client: &Client,
    base_url: &str,
    page: Option<u32>,
    limit: Option<u32>,
) -> Result<PatientPage> {
    let url = patients_url(base_url, page, limit)?;
    info!(url = %url, "Fetching patients");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(ApiError::from_request)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::from_status(status).into());
    }

    let body = response
        .text()
        .await
        .map_err(ApiError::from_request)?;

    let page = decode_records(&body).context("Failed to parse patient response")?;
    debug!(records = page.records.len(), "Decoded patient page");
    Ok(page)
}

/// Decode patient records from JSON text.
///
/// Accepts either a bare array of records or the API response envelope.
pub fn decode_records(json: &str) -> Result<PatientPage> {
    let value: Value = serde_json::from_str(json).context("Invalid JSON")?;

    match value {
        Value::Array(records) => Ok(PatientPage {
            records,
            ..PatientPage::default()
        }),
        Value::Object(_) => {
            let response: PatientResponse =
                serde_json::from_value(value).context("Unexpected response envelope")?;
            Ok(response.into_page())
        }
        _ => Err(anyhow!(
            "Expected a JSON array of patients or a response object"
        )),
    }
}


#[cfg(test)]
mod tests {
    use super::test_server::serve_once;
    use super::*;
    use crate::api::create_client;
    use serde_json::json;
    use std::time::Duration;

    const PAGE_BODY: &str = r#"{"data":[{"patient_id":"DEMO001","blood_pressure":"120/80","temperature":98.6,"age":30}],"pagination":{"page":2,"limit":5,"hasNext":false}}"#;

    #[test]
    fn test_patients_url_plain() {
        let url = patients_url("https://assessment.ksensetech.com/api", None, None).unwrap();
        assert_eq!(url.as_str(), "https://assessment.ksensetech.com/api/patients");
    }

    #[test]
    fn test_patients_url_trailing_slash() {
        let url = patients_url("https://example.com/api/", None, None).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/patients");
    }

    #[test]
    fn test_patients_url_with_params() {
        let url = patients_url("https://example.com/api", Some(2), Some(20)).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/patients?page=2&limit=20");
    }

    #[test]
    fn test_patients_url_invalid() {
        assert!(patients_url("not a url", None, None).is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR)
        ));
    }

    #[test]
    fn test_status_message() {
        let message = ApiError::from_status(StatusCode::BAD_GATEWAY).to_string();
        assert!(message.contains("502"));
    }

    #[test]
    fn test_decode_array() {
        let page = decode_records(r#"[{"patient_id": "A"}, null]"#).unwrap();
        assert_eq!(page.records.len(), 2);
        assert!(page.pagination.is_none());
    }

    #[test]
    fn test_decode_envelope() {
        let json = json!({
            "data": [{"patient_id": "A", "age": 50}],
            "pagination": {"page": 1, "hasNext": false}
        })
        .to_string();
        let page = decode_records(&json).unwrap();
        assert_eq!(page.records, vec![json!({"patient_id": "A", "age": 50})]);
        assert_eq!(page.pagination.unwrap().has_next, Some(false));
    }

    #[test]
    fn test_decode_rejects_scalars() {
        assert!(decode_records("42").is_err());
        assert!(decode_records("not json").is_err());
    }

    #[tokio::test]
    async fn test_fetch_sends_headers_and_params() {
        let (base_url, server) = serve_once("200 OK", PAGE_BODY).await;
        let client = create_client("ak_test_123", Duration::from_secs(5)).unwrap();

        let page = fetch_patients(&client, &base_url, Some(2), Some(5))
            .await
            .unwrap();

        let request = server.await.unwrap();
        let head = request.to_lowercase();
        assert!(request.starts_with("GET /api/patients?page=2&limit=5 HTTP/1.1\r\n"));
        assert!(head.contains("\r\nx-api-key: ak_test_123\r\n"));
        assert!(head.contains("\r\ncontent-type: application/json\r\n"));

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0]["patient_id"], json!("DEMO001"));
        assert_eq!(page.pagination.unwrap().page, Some(2));
    }

    #[tokio::test]
    async fn test_fetch_without_params_has_no_query() {
        let (base_url, server) = serve_once("200 OK", "[]").await;
        let client = create_client("ak_test_123", Duration::from_secs(5)).unwrap();

        let page = fetch_patients(&client, &base_url, None, None).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/patients HTTP/1.1\r\n"));
        assert!(page.records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unauthorized_maps_to_api_error() {
        let (base_url, server) =
            serve_once("401 Unauthorized", r#"{"error":"Invalid API key"}"#).await;
        let client = create_client("wrong", Duration::from_secs(5)).unwrap();

        let err = fetch_patients(&client, &base_url, None, None)
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized(StatusCode::UNAUTHORIZED))
        ));
    }

    #[tokio::test]
    async fn test_fetch_rate_limited_maps_to_api_error() {
        let (base_url, server) =
            serve_once("429 Too Many Requests", r#"{"error":"Rate limit exceeded"}"#).await;
        let client = create_client("ak_test_123", Duration::from_secs(5)).unwrap();

        let err = fetch_patients(&client, &base_url, None, None)
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_parse_error() {
        let (base_url, server) = serve_once("200 OK", "not json").await;
        let client = create_client("ak_test_123", Duration::from_secs(5)).unwrap();

        let err = fetch_patients(&client, &base_url, None, None)
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(err.downcast_ref::<ApiError>().is_none());
        assert!(format!("{:#}", err).contains("Failed to parse patient response"));
    }
}
