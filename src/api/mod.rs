//! HTTP API module for the workforce compliance engine.
//!
//! This module exposes every report as a `GET` endpoint with query
//! parameters and JSON responses.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DrilldownQuery, EmployeeQuery, FilterQuery, ScopeQuery};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
