//! Configuration types for the compliance engine.
//!
//! Every field has a default so a partial `settings.yaml` (or none at all)
//! yields a complete configuration.

use serde::{Deserialize, Serialize};

use crate::engine::ClassificationMode;

/// Defaults applied to query parameters the caller leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    /// Minimum group headcount for rollups.
    pub min_headcount: u32,
    /// Months covered by the executive scorecard trend.
    pub scorecard_months_back: u32,
    /// Months covered by the trends page.
    pub trend_months_back: u32,
    /// Months covered by the hiring trend chart.
    pub hiring_months_back: u32,
    /// Number of rows in the top risky positions list.
    pub top_risky: usize,
    /// Page size of the employee list.
    pub page_size: usize,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            min_headcount: 3,
            scorecard_months_back: 12,
            trend_months_back: 24,
            hiring_months_back: 24,
            top_risky: 10,
            page_size: 50,
        }
    }
}

/// Caps applied after ranking, and bounds on caller-supplied values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLimits {
    /// Upper bound accepted for `months_back`.
    pub max_months_back: u32,
    /// Rows shown on the designation composition chart.
    pub designation_chart: usize,
    /// Rows shown on the department composition chart.
    pub department_chart: usize,
    /// Departments listed in the company drill-down.
    pub drilldown_departments: usize,
    /// Designations listed in the designation breakdown.
    pub designation_breakdown: usize,
    /// Branches charted in the branch-level trend.
    pub branch_series: usize,
    /// Upper bound accepted for the employee list page size.
    pub max_page_size: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            max_months_back: 120,
            designation_chart: 15,
            department_chart: 20,
            drilldown_departments: 30,
            designation_breakdown: 50,
            branch_series: 6,
            max_page_size: 500,
        }
    }
}

/// Classification mode per report audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationSettings {
    /// HR compliance views: KPIs, department compliance, matrix.
    pub compliance: ClassificationMode,
    /// Executive views: scorecard, holding comparison, drill-downs, risky positions.
    pub executive: ClassificationMode,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            compliance: ClassificationMode::ThresholdTen,
            executive: ClassificationMode::ThresholdTwo,
        }
    }
}

/// Complete engine configuration loaded from `settings.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Query parameter defaults.
    pub defaults: QueryDefaults,
    /// Ranking caps and parameter bounds.
    pub limits: ReportLimits,
    /// Classification modes.
    pub classification: ClassificationSettings,
}
