//! HTTP API module for the labor entitlements engine.
//!
//! This module provides the REST endpoints for settlements (`POST /severance`),
//! payslips (`POST /payroll`) and the indicators in effect (`GET /indicators`).
//! Request bodies accept amounts the way people type them; see
//! [`coerce_amount`] and [`coerce_quantity`].

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PayrollRequest, SeveranceRequest, coerce_amount, coerce_quantity};
pub use response::{
    ApiError, ApiErrorResponse, CalculationEnvelope, ENGINE_VERSION, IndicatorsResponse,
};
pub use state::AppState;
