use serde::Serialize;
use thiserror::Error;

/// Default message when the provider rejects an image without saying why
pub const DEFAULT_NOT_FOOD_MESSAGE: &str = "Não foi possível identificar alimentos na imagem.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "INVALID_FOOD_IMAGE")]
    InvalidFoodImage,
    #[serde(rename = "INVALID_REQUEST")]
    InvalidRequest,
    #[serde(rename = "PROVIDER_ERROR")]
    ProviderError,
}

impl ErrorCode {
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::InvalidFoodImage | ErrorCode::InvalidRequest => 400,
            ErrorCode::ProviderError => 502,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFoodImage => "INVALID_FOOD_IMAGE",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::ProviderError => "PROVIDER_ERROR",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// The provider said explicitly that the image holds no food
    #[error("{0}")]
    InvalidFoodImage(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Vision provider error: {0}")]
    Provider(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidFoodImage(_) => ErrorCode::InvalidFoodImage,
            AppError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            AppError::Provider(_) => ErrorCode::ProviderError,
        }
    }

    /// Message safe to show to mobile clients
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidFoodImage(msg) | AppError::InvalidRequest(msg) => msg.clone(),
            AppError::Provider(_) => "Meal analysis is temporarily unavailable".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            error: ErrorDetail {
                code: err.code(),
                message: err.client_message(),
            },
        }
    }
}

#[cfg(feature = "http-server")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.code().http_status())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        match &self {
            AppError::Provider(e) => log::error!("❌ Provider failure: {:#}", e),
            other => log::info!("↩️ Client error {}: {}", other.code().as_str(), other),
        }

        (status, axum::Json(ErrorBody::from(&self))).into_response()
    }
}
