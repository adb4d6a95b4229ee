use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{WolError, WolSuccess};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// JSON body returned by the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WolResponse {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&WolSuccess> for WolResponse {
    fn from(success: &WolSuccess) -> Self {
        Self {
            status: Status::Success,
            message: success.message(),
            details: Some(success.details.clone()),
        }
    }
}

impl From<&WolError> for WolResponse {
    fn from(error: &WolError) -> Self {
        Self {
            status: Status::Error,
            message: error.to_string(),
            details: error.details().map(str::to_string),
        }
    }
}

impl IntoResponse for WolSuccess {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(WolResponse::from(&self))).into_response()
    }
}

impl IntoResponse for WolError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(WolResponse::from(&self))).into_response()
    }
}
