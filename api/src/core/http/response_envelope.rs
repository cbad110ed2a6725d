use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Universal response envelope for both success and error.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// "success" or "error".
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Fine-grained error details (per-field, hints, etc.).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Field path like `github_url` or `pr_number`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Optional hint to help the client fix the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Build a success envelope carrying data.
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data: Some(data),
            details: Vec::new(),
        }
    }

    /// Build a success envelope carrying data plus a human-readable message.
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data: Some(data),
            details: Vec::new(),
        }
    }

    /// Build an error envelope.
    pub fn error(message: impl Into<String>, details: Vec<ApiErrorDetail>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
            data: None,
            details,
        }
    }

    /// Convert to axum Response.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
