//! HTTP request handlers for the labor entitlements API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_payroll, calculate_severance};
use crate::models::{PayrollInput, SeveranceInput};

use super::request::{PayrollRequest, SeveranceRequest};
use super::response::{ApiError, ApiErrorResponse, CalculationEnvelope, IndicatorsResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/severance", post(severance_handler))
        .route("/payroll", post(payroll_handler))
        .route("/indicators", get(indicators_handler))
        .with_state(state)
}

/// Handler for POST /severance.
///
/// Accepts a termination scenario and returns the settlement breakdown.
async fn severance_handler(
    State(state): State<AppState>,
    payload: Result<Json<SeveranceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing severance request");

    let input: SeveranceInput = match payload {
        Ok(Json(req)) => req.into(),
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let config = state.config();
    let start_time = Instant::now();
    match calculate_severance(&input, &config) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                cause = input.cause.code(),
                total = %result.total,
                duration_us = start_time.elapsed().as_micros(),
                "Severance calculated"
            );
            json_response(StatusCode::OK, CalculationEnvelope::new(correlation_id, result))
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Severance calculation failed");
            error_response(err.into())
        }
    }
}

/// Handler for POST /payroll.
///
/// Accepts a monthly payslip and returns the gross-to-net breakdown.
async fn payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let input: PayrollInput = match payload {
        Ok(Json(req)) => req.into(),
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let config = state.config();
    let start_time = Instant::now();
    match calculate_payroll(&input, &config) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                gross = %result.gross.total_taxable,
                net_pay = %result.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll calculated"
            );
            json_response(StatusCode::OK, CalculationEnvelope::new(correlation_id, result))
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Payroll calculation failed");
            error_response(err.into())
        }
    }
}

/// Handler for GET /indicators.
async fn indicators_handler(State(state): State<AppState>) -> Response {
    let config = state.config();
    json_response(
        StatusCode::OK,
        IndicatorsResponse::new(&config, state.origin()),
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    json_response(api_error.status, api_error.error)
}

/// Maps a body extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}
