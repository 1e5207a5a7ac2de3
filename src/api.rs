use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Error body returned by every failing endpoint. `detail` only appears on
/// 500s, carrying the raw error text next to the opaque message.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub type ApiError = (StatusCode, Json<ApiMessage>);

/// Success envelope: `{ "data": ..., "message": "..." }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
    pub message: String,
}

pub fn data<T: Serialize>(data: T, message: &str) -> Json<DataResponse<T>> {
    Json(DataResponse {
        data,
        message: message.to_string(),
    })
}

pub fn message(msg: &str) -> Json<ApiMessage> {
    Json(ApiMessage {
        message: msg.to_string(),
        detail: None,
    })
}

pub fn bad_request(msg: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, message(msg))
}

pub fn not_found(msg: &str) -> ApiError {
    (StatusCode::NOT_FOUND, message(msg))
}

pub fn unauthorized() -> ApiError {
    (StatusCode::UNAUTHORIZED, message("Access denied"))
}

pub fn forbidden() -> ApiError {
    (
        StatusCode::FORBIDDEN,
        message("You do not have the required permissions"),
    )
}

pub fn internal<E: std::fmt::Display>(err: E) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiMessage {
            message: "Internal server error".to_string(),
            detail: Some(err.to_string()),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_hides_detail_unless_present() {
        let (status, body) = bad_request("Invalid difficulty level");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json = serde_json::to_string(&body.0).unwrap();
        assert_eq!(json, r#"{"message":"Invalid difficulty level"}"#);
    }

    #[test]
    fn internal_carries_raw_detail() {
        let (status, body) = internal("db connection reset");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json = serde_json::to_string(&body.0).unwrap();
        assert!(json.contains("Internal server error"));
        assert!(json.contains("db connection reset"));
    }

    #[test]
    fn data_envelope_shape() {
        let body = data(vec![1, 2, 3], "List of things");
        let json = serde_json::to_string(&body.0).unwrap();
        assert_eq!(json, r#"{"data":[1,2,3],"message":"List of things"}"#);
    }
}
