// src/api/parser.rs
//! Response parsing: success bodies into typed values, failures into errors.

use super::client::ApiResponse;
use super::responses::ErrorResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use reqwest::StatusCode;

/// Parse any Notion API response.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        Err(parse_error(&result.data, result.status, &result.url))
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::Deserialization {
            source: e,
            body: preview(body),
        }
    })
}

/// Turn a failed response into a typed service error.
pub fn parse_error(body: &str, status: StatusCode, url: &str) -> AppError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) => {
            log::debug!(
                "Notion error {} ({}) from {}, request {:?}",
                error.code,
                error.status,
                url,
                error.request_id
            );
            AppError::NotionService {
                code: NotionErrorCode::from_api_response(&error.code),
                message: error.message,
                status,
            }
        }
        Err(_) => AppError::NotionService {
            code: NotionErrorCode::from_http_status(status.as_u16()),
            message: format!("HTTP {} from {}: {}", status, url, preview(body)),
            status,
        },
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn response(status: StatusCode, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://api.notion.com/v1/pages/abc".to_string(),
        }
    }

    #[test]
    fn test_error_body_becomes_typed_code() {
        let body = r#"{
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find page with ID: abc123",
            "request_id": "req_123"
        }"#;

        let result = parse_api_response::<Value>(response(StatusCode::NOT_FOUND, body));
        match result {
            Err(AppError::NotionService { code, message, status }) => {
                assert_eq!(code, NotionErrorCode::ObjectNotFound);
                assert_eq!(message, "Could not find page with ID: abc123");
                assert_eq!(status, StatusCode::NOT_FOUND);
            }
            other => panic!("Expected NotionService error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_error_falls_back_to_status() {
        let result = parse_api_response::<Value>(response(StatusCode::BAD_GATEWAY, "<html>"));
        let err = result.unwrap_err();
        assert_eq!(err.notion_code(), Some(&NotionErrorCode::HttpStatus(502)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_bad_success_body_is_a_deserialization_error() {
        let result = parse_api_response::<Vec<u8>>(response(StatusCode::OK, "{\"x\":1}"));
        assert!(matches!(result, Err(AppError::Deserialization { .. })));
    }
}
