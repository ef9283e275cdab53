use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use moto_rental::domain::{
    booking::{BookingError, DateError, SlotError},
    DataAccessError,
};
use serde::{Deserialize, Serialize};

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Rejected(BookingError),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ApiError {
        match self {
            AppError::NotFound(msg) => ApiError::new("NOT_FOUND", msg.as_str()),
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg.as_str()),
            AppError::Rejected(e) => ApiError::new("BOOKING_REJECTED", e.to_string()),
            AppError::Internal(msg) => ApiError::new("INTERNAL_ERROR", msg.as_str()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(msg) = &self {
            tracing::error!("内部エラー: {}", msg);
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(value: BookingError) -> Self {
        AppError::Rejected(value)
    }
}

impl From<SlotError> for AppError {
    fn from(value: SlotError) -> Self {
        AppError::BadRequest(value.to_string())
    }
}

impl From<DateError> for AppError {
    fn from(value: DateError) -> Self {
        AppError::BadRequest(value.to_string())
    }
}

impl From<DataAccessError> for AppError {
    fn from(value: DataAccessError) -> Self {
        AppError::Internal(value.to_string())
    }
}
