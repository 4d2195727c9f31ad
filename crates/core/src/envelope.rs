use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Uniform response body: every endpoint answers with
/// `{"success": bool, "message": string, "data": object}` and lets the HTTP
/// status carry the semantic result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl ApiResponse<Value> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: json!({}),
        }
    }
}
