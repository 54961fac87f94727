//! Executive views over a company set.
//!
//! Every figure is a month-end or as-of snapshot reconstructed from hire and
//! termination dates, pooled across the companies of the scope.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineSettings;
use crate::engine::{
    CompanyData, ScopeSelector, TrendSeries, branch_series, classify, expand_scope, load_scope,
    month_grid, month_label, month_over_month, previous_month_end, rank_worst_first, scope_point,
    trend,
};
use crate::error::EngineResult;
use crate::models::{AggregateRow, ChartDataset, ChartPayload, ComplianceStatus};
use crate::store::WorkforceStore;

use super::company_row;

/// Pooled headline of the scope at the reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallScore {
    /// Employees counted across the scope.
    pub total_employees: u32,
    /// National employees.
    pub national_count: u32,
    /// Non-national employees.
    pub non_national_count: u32,
    /// Pooled composition, 1 dp.
    pub composition_percent: Decimal,
    /// Headcount-weighted target.
    pub target_percent: Option<Decimal>,
    /// `composition_percent - target_percent`.
    pub variance_percent: Option<Decimal>,
    /// Status under the executive classification mode.
    pub status: Option<ComplianceStatus>,
    /// Composition change since the end of the previous month.
    pub mom_change: Option<Decimal>,
}

/// Companies of the scope ranked by risk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoldingRisk {
    /// Company identifiers, worst first.
    pub labels: Vec<String>,
    /// Variance per company, aligned with `labels`.
    pub variance_values: Vec<Option<Decimal>>,
    /// Full rows, labelled by company.
    pub rows: Vec<AggregateRow>,
}

/// Executive scorecard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutiveScorecard {
    /// Pooled headline.
    pub overall: OverallScore,
    /// Monthly series ending at the reference month.
    pub trend: TrendSeries,
    /// Per-company risk list.
    pub holding: HoldingRisk,
}

/// Trends page payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendData {
    /// Pooled monthly series.
    pub overall: TrendSeries,
    /// Per-branch series; empty unless one company was selected.
    pub branch_level: ChartPayload,
}

/// Holding versus subsidiaries payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingComparison {
    /// Subsidiary rows, worst first.
    pub rows: Vec<AggregateRow>,
    /// Actual and target per subsidiary, in company order.
    pub chart: ChartPayload,
}

fn load_selected(
    store: &dyn WorkforceStore,
    selector: &ScopeSelector,
) -> EngineResult<Vec<CompanyData>> {
    let companies = expand_scope(store, selector)?;
    let data = load_scope(store, &companies);
    debug!(
        requested = companies.len(),
        loaded = data.len(),
        "Scope expanded"
    );
    Ok(data)
}

fn company_rows(
    data: &[CompanyData],
    branch: Option<&str>,
    as_of: NaiveDate,
    settings: &EngineSettings,
) -> Vec<AggregateRow> {
    data.iter()
        .map(|d| company_row(d, branch, as_of, settings.classification.executive))
        .collect()
}

/// Scorecard of a company, a holding's subsidiaries or every company.
///
/// The month-over-month change compares the reference date against the end
/// of the previous month over the same scope.
pub fn executive_scorecard(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    selector: &ScopeSelector,
    branch: Option<&str>,
    as_of: NaiveDate,
    months_back: u32,
) -> EngineResult<ExecutiveScorecard> {
    let data = load_selected(store, selector)?;

    let point = scope_point(&data, branch, as_of);
    let previous = scope_point(&data, branch, previous_month_end(as_of));
    let result = classify(
        point.snapshot.composition_percent,
        point.target_percent,
        settings.classification.executive,
    );

    let overall = OverallScore {
        total_employees: point.snapshot.total,
        national_count: point.snapshot.national_count,
        non_national_count: point.snapshot.non_national_count,
        composition_percent: point.snapshot.composition_percent,
        target_percent: point.target_percent,
        variance_percent: result.variance,
        status: result.status,
        mom_change: month_over_month(&point.snapshot, &previous.snapshot),
    };

    let mut rows = company_rows(&data, branch, as_of, settings);
    rank_worst_first(&mut rows);

    Ok(ExecutiveScorecard {
        overall,
        trend: trend(&data, branch, as_of, months_back),
        holding: HoldingRisk {
            labels: rows.iter().map(|r| r.label.clone()).collect(),
            variance_values: rows.iter().map(|r| r.variance_percent).collect(),
            rows,
        },
    })
}

/// Pooled trend plus, for a single company, per-branch series.
pub fn trend_data(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    selector: &ScopeSelector,
    branch: Option<&str>,
    as_of: NaiveDate,
    months_back: u32,
) -> EngineResult<TrendData> {
    let data = load_selected(store, selector)?;
    let overall = trend(&data, branch, as_of, months_back);

    let single = selector
        .company()
        .and_then(|company| data.iter().find(|d| d.company == company));
    let branch_level = match single {
        Some(company) => branch_series(company, as_of, months_back, settings.limits.branch_series),
        None => ChartPayload {
            labels: month_grid(as_of, months_back)
                .into_iter()
                .map(month_label)
                .collect(),
            datasets: Vec::new(),
        },
    };

    Ok(TrendData {
        overall,
        branch_level,
    })
}

/// Subsidiaries of a holding against their targets.
///
/// An unknown holding, or one without subsidiaries, yields empty rows.
pub fn holding_comparison(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    holding: &str,
    as_of: NaiveDate,
) -> EngineResult<HoldingComparison> {
    let data = load_selected(store, &ScopeSelector::Holding(holding.to_string()))?;
    let mut rows = company_rows(&data, None, as_of, settings);

    let chart = ChartPayload {
        labels: rows.iter().map(|r| r.label.clone()).collect(),
        datasets: vec![
            ChartDataset {
                name: "Actual".to_string(),
                values: rows.iter().map(|r| Some(r.composition_percent)).collect(),
            },
            ChartDataset {
                name: "Target".to_string(),
                values: rows.iter().map(|r| r.target_percent).collect(),
            },
        ],
    };

    rank_worst_first(&mut rows);
    Ok(HoldingComparison { rows, chart })
}
