//! Response envelope for the admin API.

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// `{code: 200, data}` on success, `{code: 500, message}` on failure.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Ok { code: u16, data: T },
    Err { code: u16, message: String },
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::Ok {
            code: StatusCode::OK.as_u16(),
            data,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Err {
            code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Ok { code, .. } | Self::Err { code, .. } => *code,
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for ApiResponse<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                error!("Admin operation failed: {}", e);
                Self::failed(e.to_string())
            }
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
