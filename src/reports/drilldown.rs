//! Point-in-time drill-downs of one company.
//!
//! Company → branch / department → designation. Records without a value for
//! the grouped dimension are left out, and each row's target is resolved
//! for the row's own dimension values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineSettings;
use crate::engine::{
    CompanyData, Dimension, DimensionFilter, Grouping, RecordFilter, RollupQuery, SalaryIndex,
    aggregate, attach_targets, rank_worst_first,
};
use crate::error::EngineResult;
use crate::models::AggregateRow;
use crate::store::WorkforceStore;

use super::{ensure_company, overrides_for};

/// Branch and department breakdown of a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDrilldown {
    /// Company reported on.
    pub company: String,
    /// Reference date.
    pub as_of_date: NaiveDate,
    /// Branch the department breakdown is narrowed to.
    pub branch: Option<String>,
    /// Company default target in force.
    pub target_percent: Option<Decimal>,
    /// One row per branch, worst first.
    pub branches: Vec<AggregateRow>,
    /// One row per department, worst first, capped.
    pub departments: Vec<AggregateRow>,
}

/// Designations within one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignationBreakdown {
    /// Company reported on.
    pub company: String,
    /// Department drilled into.
    pub department: String,
    /// Optional branch filter.
    pub branch: Option<String>,
    /// Reference date.
    pub as_of_date: NaiveDate,
    /// Target in force for the department.
    pub target_percent: Option<Decimal>,
    /// One row per designation, worst first, capped.
    pub designations: Vec<AggregateRow>,
}

/// Worst designations of a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskyPositions {
    /// Company reported on.
    pub company: String,
    /// Optional branch filter.
    pub branch: Option<String>,
    /// Reference date.
    pub as_of_date: NaiveDate,
    /// Company default target in force.
    pub target_percent: Option<Decimal>,
    /// Worst designations, at most `top_n`.
    pub items: Vec<AggregateRow>,
}

struct Breakdown<'a> {
    data: &'a CompanyData,
    as_of: NaiveDate,
    settings: &'a EngineSettings,
}

impl Breakdown<'_> {
    fn rows(
        &self,
        dimension: Dimension,
        filter: RecordFilter,
        min_headcount: u32,
        fixed: DimensionFilter<'_>,
    ) -> Vec<AggregateRow> {
        let grouping = Grouping::By(dimension);
        let query = RollupQuery::new(grouping)
            .as_of(self.as_of)
            .with_filter(filter)
            .min_headcount(min_headcount)
            .skip_unassigned();
        let rows = aggregate(&self.data.employees, &SalaryIndex::default(), &query);
        let mut rows = attach_targets(
            rows,
            grouping,
            overrides_for(self.data, self.as_of).as_ref(),
            fixed,
            self.settings.classification.executive,
        );
        rank_worst_first(&mut rows);
        rows
    }

    fn target(&self, filter: DimensionFilter<'_>) -> Option<Decimal> {
        overrides_for(self.data, self.as_of).map(|o| o.target_for(filter))
    }
}

fn branch_filter(branch: Option<&str>) -> RecordFilter {
    RecordFilter {
        branch: branch.map(str::to_string),
        ..RecordFilter::default()
    }
}

/// Branches of a company and its departments, optionally within a branch.
pub fn company_drilldown(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    company: &str,
    branch: Option<&str>,
    as_of: NaiveDate,
) -> EngineResult<CompanyDrilldown> {
    ensure_company(store, company)?;
    let data = CompanyData::load(store, company)?;
    let breakdown = Breakdown {
        data: &data,
        as_of,
        settings,
    };

    let branches = breakdown.rows(
        Dimension::Branch,
        RecordFilter::default(),
        0,
        DimensionFilter::none(),
    );
    let mut departments = breakdown.rows(
        Dimension::Department,
        branch_filter(branch),
        0,
        DimensionFilter::none(),
    );
    departments.truncate(settings.limits.drilldown_departments);

    Ok(CompanyDrilldown {
        company: company.to_string(),
        as_of_date: as_of,
        branch: branch.map(str::to_string),
        target_percent: breakdown.target(DimensionFilter::none()),
        branches,
        departments,
    })
}

/// Designations of one department, optionally within a branch.
pub fn designation_breakdown(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    company: &str,
    department: &str,
    branch: Option<&str>,
    as_of: NaiveDate,
    min_headcount: u32,
) -> EngineResult<DesignationBreakdown> {
    ensure_company(store, company)?;
    let data = CompanyData::load(store, company)?;
    let breakdown = Breakdown {
        data: &data,
        as_of,
        settings,
    };

    let filter = RecordFilter {
        department: Some(department.to_string()),
        ..branch_filter(branch)
    };
    let mut designations = breakdown.rows(
        Dimension::Designation,
        filter,
        min_headcount,
        DimensionFilter::department(department),
    );
    designations.truncate(settings.limits.designation_breakdown);

    Ok(DesignationBreakdown {
        company: company.to_string(),
        department: department.to_string(),
        branch: branch.map(str::to_string),
        as_of_date: as_of,
        target_percent: breakdown.target(DimensionFilter::department(department)),
        designations,
    })
}

/// The `top_n` designations furthest below target.
pub fn top_risky_positions(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    company: &str,
    branch: Option<&str>,
    as_of: NaiveDate,
    top_n: usize,
    min_headcount: u32,
) -> EngineResult<RiskyPositions> {
    ensure_company(store, company)?;
    let data = CompanyData::load(store, company)?;
    let breakdown = Breakdown {
        data: &data,
        as_of,
        settings,
    };

    let mut items = breakdown.rows(
        Dimension::Designation,
        branch_filter(branch),
        min_headcount,
        DimensionFilter::none(),
    );
    items.truncate(top_n);

    Ok(RiskyPositions {
        company: company.to_string(),
        branch: branch.map(str::to_string),
        as_of_date: as_of,
        target_percent: breakdown.target(DimensionFilter::none()),
        items,
    })
}
