//! Response types for the labor entitlements API.
//!
//! This module defines the calculation envelope, the indicators response,
//! and the error response structures of the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EconomicConfig;
use crate::error::EngineError;
use crate::indicators::IndicatorOrigin;

/// The version reported in every calculation envelope.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A calculation result with its request metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationEnvelope<T> {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The engine result.
    pub result: T,
}

impl<T> CalculationEnvelope<T> {
    /// Wraps a result computed for the request identified by `calculation_id`.
    pub fn new(calculation_id: Uuid, result: T) -> Self {
        Self {
            calculation_id,
            timestamp: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            result,
        }
    }
}

/// Response body for `GET /indicators`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorsResponse {
    /// Unidad de Fomento.
    pub uf: Decimal,
    /// Unidad Tributaria Mensual.
    pub utm: Decimal,
    /// Ingreso Mínimo Mensual.
    pub imm: Decimal,
    /// The date the values apply to.
    pub effective_date: NaiveDate,
    /// Where the values came from.
    pub origin: IndicatorOrigin,
}

impl IndicatorsResponse {
    /// Builds the response from a configuration snapshot.
    pub fn new(config: &EconomicConfig, origin: IndicatorOrigin) -> Self {
        let indicators = config.indicators();
        Self {
            uf: indicators.uf,
            utm: indicators.utm,
            imm: indicators.imm,
            effective_date: indicators.effective_date,
            origin,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { field, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    format!("Invalid configuration '{}'", field),
                    message,
                ),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid input '{}': {}", field, message),
                    "The request contains inconsistent values",
                ),
            },
        }
    }
}
