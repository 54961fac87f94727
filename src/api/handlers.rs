//! HTTP request handlers for the workforce compliance API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! handler parses its query string, runs one report and returns JSON.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{AggregateRow, ChartPayload};
use crate::reports::{
    self, ActualVsTarget, CompanyDrilldown, DesignationBreakdown, EmployeePage,
    ExecutiveScorecard, HoldingComparison, KpiSummary, RiskyPositions, TrendData,
};

use super::request::{DrilldownQuery, EmployeeQuery, FilterQuery, ScopeQuery, months_back};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/kpis", get(kpis_handler))
        .route("/nationality-groups", get(nationality_groups_handler))
        .route("/designations", get(designations_handler))
        .route("/departments", get(departments_handler))
        .route("/salary-bands", get(salary_bands_handler))
        .route("/hiring-trend", get(hiring_trend_handler))
        .route("/actual-vs-target", get(actual_vs_target_handler))
        .route("/department-compliance", get(department_compliance_handler))
        .route("/matrix", get(matrix_handler))
        .route("/executive-scorecard", get(executive_scorecard_handler))
        .route("/trends", get(trends_handler))
        .route("/holding-comparison", get(holding_comparison_handler))
        .route("/company-drilldown", get(company_drilldown_handler))
        .route("/designation-breakdown", get(designation_breakdown_handler))
        .route("/top-risky-positions", get(top_risky_positions_handler))
        .route("/employees", get(employees_handler))
        .with_state(state)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Number of rows a payload carries, for request logging.
trait RowCount {
    fn row_count(&self) -> usize;
}

impl RowCount for Vec<AggregateRow> {
    fn row_count(&self) -> usize {
        self.len()
    }
}

impl RowCount for ChartPayload {
    fn row_count(&self) -> usize {
        self.labels.len()
    }
}

impl RowCount for KpiSummary {
    fn row_count(&self) -> usize {
        1
    }
}

impl RowCount for ActualVsTarget {
    fn row_count(&self) -> usize {
        self.chart.labels.len()
    }
}

impl RowCount for ExecutiveScorecard {
    fn row_count(&self) -> usize {
        self.holding.rows.len()
    }
}

impl RowCount for TrendData {
    fn row_count(&self) -> usize {
        self.overall.labels.len()
    }
}

impl RowCount for HoldingComparison {
    fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl RowCount for CompanyDrilldown {
    fn row_count(&self) -> usize {
        self.branches.len() + self.departments.len()
    }
}

impl RowCount for DesignationBreakdown {
    fn row_count(&self) -> usize {
        self.designations.len()
    }
}

impl RowCount for RiskyPositions {
    fn row_count(&self) -> usize {
        self.items.len()
    }
}

impl RowCount for EmployeePage {
    fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Unwraps the query string or builds the 400 response for it.
fn parse_query<T>(
    query: Result<Query<T>, QueryRejection>,
    correlation_id: Uuid,
    endpoint: &'static str,
) -> Result<T, Response> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(rejection) => {
            let body_text = rejection.body_text();
            warn!(
                correlation_id = %correlation_id,
                endpoint,
                error = %body_text,
                "Invalid query string"
            );
            Err(json_response(
                StatusCode::BAD_REQUEST,
                ApiError::invalid_query(body_text),
            ))
        }
    }
}

/// Runs a report and maps its outcome to a JSON response.
fn run_report<T, F>(correlation_id: Uuid, endpoint: &'static str, report: F) -> Response
where
    T: Serialize + RowCount,
    F: FnOnce() -> EngineResult<T>,
{
    let start_time = Instant::now();
    match report() {
        Ok(payload) => {
            info!(
                correlation_id = %correlation_id,
                endpoint,
                rows = payload.row_count(),
                duration_us = start_time.elapsed().as_micros(),
                "Report completed successfully"
            );
            json_response(StatusCode::OK, payload)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                endpoint,
                error = %err,
                "Report failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn start(endpoint: &'static str) -> Uuid {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint, "Processing report request");
    correlation_id
}

/// Handler for GET /kpis.
async fn kpis_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/kpis");
    let query = match parse_query(query, correlation_id, "/kpis") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/kpis", || {
        let filter = query.filter()?;
        reports::kpis(state.store(), state.settings(), &filter, query.as_of(today()))
    })
}

/// Handler for GET /nationality-groups.
async fn nationality_groups_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/nationality-groups");
    let query = match parse_query(query, correlation_id, "/nationality-groups") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/nationality-groups", || {
        reports::nationality_groups(state.store(), &query.filter()?)
    })
}

/// Handler for GET /designations.
async fn designations_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/designations");
    let query = match parse_query(query, correlation_id, "/designations") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/designations", || {
        let filter = query.filter()?;
        let settings = state.settings();
        reports::designation_chart(state.store(), settings, &filter, query.min_headcount(settings))
    })
}

/// Handler for GET /departments.
async fn departments_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/departments");
    let query = match parse_query(query, correlation_id, "/departments") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/departments", || {
        reports::department_chart(state.store(), state.settings(), &query.filter()?)
    })
}

/// Handler for GET /salary-bands.
async fn salary_bands_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/salary-bands");
    let query = match parse_query(query, correlation_id, "/salary-bands") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/salary-bands", || {
        reports::salary_band_chart(state.store(), &query.filter()?)
    })
}

/// Handler for GET /hiring-trend.
async fn hiring_trend_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/hiring-trend");
    let query = match parse_query(query, correlation_id, "/hiring-trend") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/hiring-trend", || {
        let filter = query.filter()?;
        let settings = state.settings();
        let months = months_back(query.months_back, settings.defaults.hiring_months_back, settings)?;
        reports::hiring_trend(state.store(), &filter, query.as_of(today()), months)
    })
}

/// Handler for GET /actual-vs-target.
async fn actual_vs_target_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/actual-vs-target");
    let query = match parse_query(query, correlation_id, "/actual-vs-target") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/actual-vs-target", || {
        let filter = query.filter()?;
        reports::actual_vs_target(state.store(), state.settings(), &filter, query.as_of(today()))
    })
}

/// Handler for GET /department-compliance.
async fn department_compliance_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/department-compliance");
    let query = match parse_query(query, correlation_id, "/department-compliance") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/department-compliance", || {
        let filter = query.filter()?;
        let settings = state.settings();
        reports::department_compliance(
            state.store(),
            settings,
            &filter.company,
            query.as_of(today()),
            query.min_headcount(settings),
        )
    })
}

/// Handler for GET /matrix.
async fn matrix_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/matrix");
    let query = match parse_query(query, correlation_id, "/matrix") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/matrix", || {
        let filter = query.filter()?;
        let settings = state.settings();
        reports::matrix(
            state.store(),
            settings,
            &filter.company,
            query.as_of(today()),
            query.min_headcount(settings),
        )
    })
}

/// Handler for GET /executive-scorecard.
async fn executive_scorecard_handler(
    State(state): State<AppState>,
    query: Result<Query<ScopeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/executive-scorecard");
    let query = match parse_query(query, correlation_id, "/executive-scorecard") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/executive-scorecard", || {
        let settings = state.settings();
        let months = months_back(query.months_back, settings.defaults.scorecard_months_back, settings)?;
        reports::executive_scorecard(
            state.store(),
            settings,
            &query.selector(),
            query.branch().as_deref(),
            query.as_of(today()),
            months,
        )
    })
}

/// Handler for GET /trends.
async fn trends_handler(
    State(state): State<AppState>,
    query: Result<Query<ScopeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/trends");
    let query = match parse_query(query, correlation_id, "/trends") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/trends", || {
        let settings = state.settings();
        let months = months_back(query.months_back, settings.defaults.trend_months_back, settings)?;
        reports::trend_data(
            state.store(),
            settings,
            &query.selector(),
            query.branch().as_deref(),
            query.as_of(today()),
            months,
        )
    })
}

/// Handler for GET /holding-comparison.
async fn holding_comparison_handler(
    State(state): State<AppState>,
    query: Result<Query<ScopeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/holding-comparison");
    let query = match parse_query(query, correlation_id, "/holding-comparison") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/holding-comparison", || {
        let holding = query.holding()?;
        reports::holding_comparison(state.store(), state.settings(), &holding, query.as_of(today()))
    })
}

/// Handler for GET /company-drilldown.
async fn company_drilldown_handler(
    State(state): State<AppState>,
    query: Result<Query<DrilldownQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/company-drilldown");
    let query = match parse_query(query, correlation_id, "/company-drilldown") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/company-drilldown", || {
        let company = query.company()?;
        reports::company_drilldown(
            state.store(),
            state.settings(),
            &company,
            query.branch().as_deref(),
            query.as_of(today()),
        )
    })
}

/// Handler for GET /designation-breakdown.
async fn designation_breakdown_handler(
    State(state): State<AppState>,
    query: Result<Query<DrilldownQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/designation-breakdown");
    let query = match parse_query(query, correlation_id, "/designation-breakdown") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/designation-breakdown", || {
        let company = query.company()?;
        let department = query.department()?;
        let settings = state.settings();
        reports::designation_breakdown(
            state.store(),
            settings,
            &company,
            &department,
            query.branch().as_deref(),
            query.as_of(today()),
            query.min_headcount(settings),
        )
    })
}

/// Handler for GET /top-risky-positions.
async fn top_risky_positions_handler(
    State(state): State<AppState>,
    query: Result<Query<DrilldownQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/top-risky-positions");
    let query = match parse_query(query, correlation_id, "/top-risky-positions") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/top-risky-positions", || {
        let company = query.company()?;
        let settings = state.settings();
        reports::top_risky_positions(
            state.store(),
            settings,
            &company,
            query.branch().as_deref(),
            query.as_of(today()),
            query.top_n(settings),
            query.min_headcount(settings),
        )
    })
}

/// Handler for GET /employees.
async fn employees_handler(
    State(state): State<AppState>,
    query: Result<Query<EmployeeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("/employees");
    let query = match parse_query(query, correlation_id, "/employees") {
        Ok(query) => query,
        Err(response) => return response,
    };
    run_report(correlation_id, "/employees", || {
        let list_query = query.into_list_query(state.settings(), today())?;
        reports::employee_list(state.store(), &list_query)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineSettings;
    use crate::reports::fixtures;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        create_router(AppState::new(fixtures::store(), EngineSettings::default()))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = create_test_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_kpis_returns_200() {
        let (status, json) = get_json("/kpis?company=Alpha%20Trading&as_of_date=2024-07-31").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_employees"], 9);
        assert_eq!(json["composition_percent"], "44.4");
        assert_eq!(json["target_percent"], "30");
    }

    #[tokio::test]
    async fn test_missing_company_returns_validation_error() {
        let (status, json) = get_json("/kpis").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "company is required");
    }

    #[tokio::test]
    async fn test_malformed_query_returns_400() {
        let (status, json) = get_json("/designations?company=Alpha%20Trading&min_headcount=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_QUERY");
    }

    #[tokio::test]
    async fn test_unknown_company_returns_404() {
        let (status, json) = get_json("/company-drilldown?company=Nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "COMPANY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_months_back_over_limit_returns_400() {
        let (status, json) = get_json("/trends?months_back=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_PARAMETER");
    }
}
