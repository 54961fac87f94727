//! Named report operations.
//!
//! Each operation reads what it needs from a [`WorkforceStore`], runs the
//! engine over it and returns a JSON-serializable payload. Parameters arrive
//! already validated and defaulted; see [`crate::api`] for the HTTP mapping.
//!
//! Reports fall in three families:
//!
//! - [`current`]: current-state views over employees with status `Active`
//! - [`executive`]: month-end views over a company set
//! - [`drilldown`]: point-in-time breakdowns of one company
//!
//! plus the paginated [`employees`] list.

pub mod current;
pub mod drilldown;
pub mod employees;
pub mod executive;

use chrono::NaiveDate;

use crate::engine::{
    ClassificationMode, CompanyData, DimensionFilter, RecordFilter, Scope, TargetOverrides,
    classify, resolve_overrides, snapshot,
};
use crate::error::{EngineError, EngineResult};
use crate::models::AggregateRow;
use crate::store::WorkforceStore;

pub use current::{
    ActualVsTarget, KpiSummary, actual_vs_target, department_chart, department_compliance,
    designation_chart, hiring_trend, kpis, matrix, nationality_groups, salary_band_chart,
};
pub use drilldown::{
    CompanyDrilldown, DesignationBreakdown, RiskyPositions, company_drilldown,
    designation_breakdown, top_risky_positions,
};
pub use employees::{EmployeeListQuery, EmployeePage, EmployeeRow, employee_list};
pub use executive::{
    ExecutiveScorecard, HoldingComparison, HoldingRisk, OverallScore, TrendData,
    executive_scorecard, holding_comparison, trend_data,
};

/// Dimension filters shared by the current-state views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    /// Company to report on.
    pub company: String,
    /// Department equals.
    pub department: Option<String>,
    /// Designation equals.
    pub designation: Option<String>,
    /// Nationality group equals.
    pub nationality_group: Option<String>,
}

impl CompanyFilter {
    /// Filter covering a whole company.
    pub fn company(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            ..Self::default()
        }
    }

    pub(crate) fn record_filter(&self) -> RecordFilter {
        RecordFilter {
            department: self.department.clone(),
            designation: self.designation.clone(),
            nationality_group: self.nationality_group.clone(),
            ..RecordFilter::default()
        }
    }

    pub(crate) fn dimension(&self) -> DimensionFilter<'_> {
        DimensionFilter {
            department: self.department.as_deref(),
            designation: self.designation.as_deref(),
        }
    }
}

/// Fails with [`EngineError::CompanyNotFound`] unless the store knows `company`.
pub(crate) fn ensure_company(store: &dyn WorkforceStore, company: &str) -> EngineResult<()> {
    if store.companies()?.iter().any(|c| c.id == company) {
        Ok(())
    } else {
        Err(EngineError::CompanyNotFound {
            company: company.to_string(),
        })
    }
}

/// Point-in-time compliance row of one company, labelled with its identifier.
pub(crate) fn company_row(
    data: &CompanyData,
    branch: Option<&str>,
    as_of: NaiveDate,
    mode: ClassificationMode,
) -> AggregateRow {
    let scope = Scope {
        company: data.company.clone(),
        branch: branch.map(str::to_string),
    };
    let snap = snapshot(&data.employees, &scope, as_of);
    let target = resolve_overrides(&data.policies, &data.company, as_of)
        .map(|o| o.target_for(DimensionFilter::none()));
    let result = classify(snap.composition_percent, target, mode);

    AggregateRow {
        label: data.company.clone(),
        sub_label: None,
        headcount: snap.total,
        national_count: snap.national_count,
        non_national_count: snap.non_national_count,
        composition_percent: snap.composition_percent,
        target_percent: target,
        variance_percent: result.variance,
        status: result.status,
    }
}

pub(crate) fn overrides_for(data: &CompanyData, as_of: NaiveDate) -> Option<TargetOverrides> {
    resolve_overrides(&data.policies, &data.company, as_of)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! A small two-company dataset shared by report tests.

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::models::{
        AssignmentState, CompanyNode, EmployeeRecord, EmploymentStatus, PolicyRecord,
        SalaryAssignment,
    };
    use crate::store::InMemoryStore;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    fn employee(
        company: &str,
        id: &str,
        name: &str,
        branch: &str,
        department: &str,
        designation: &str,
        group: &str,
        national: bool,
        hired: NaiveDate,
    ) -> EmployeeRecord {
        EmployeeRecord {
            id: id.to_string(),
            company: company.to_string(),
            branch: Some(branch.to_string()),
            department: Some(department.to_string()),
            designation: Some(designation.to_string()),
            nationality_group: Some(group.to_string()),
            is_national: national,
            hire_date: Some(hired),
            termination_date: None,
            status: EmploymentStatus::Active,
            employee_name: Some(name.to_string()),
            employee_number: Some(format!("N-{}", id)),
            nationality: None,
        }
    }

    /// Trading: 10 records, one of which left on 2024-03-31 and one hired
    /// 2024-07-01. Logistics: 5 records.
    pub fn store() -> InMemoryStore {
        let t = "Alpha Trading";
        let l = "Alpha Logistics";
        let mut left = employee(t, "T08", "Hassan Ali", "Riyadh", "Operations", "Driver", "Asian", false, date(2022, 1, 1));
        left.termination_date = Some(date(2024, 3, 31));
        left.status = EmploymentStatus::Left;

        let employees = vec![
            employee(t, "T01", "Abdullah Saleh", "Riyadh", "Sales", "Sales Manager", "Saudi", true, date(2020, 1, 1)),
            employee(t, "T02", "Faisal Omar", "Riyadh", "Sales", "Sales Executive", "Saudi", true, date(2021, 3, 15)),
            employee(t, "T03", "Ravi Kumar", "Riyadh", "Sales", "Sales Executive", "Asian", false, date(2022, 6, 1)),
            employee(t, "T04", "Mahmoud Adel", "Jeddah", "Sales", "Sales Executive", "Arab", false, date(2023, 2, 1)),
            employee(t, "T05", "Noura Saad", "Jeddah", "Finance", "Accountant", "Saudi", true, date(2019, 5, 1)),
            employee(t, "T06", "Imran Khan", "Jeddah", "Finance", "Accountant", "Asian", false, date(2024, 1, 10)),
            employee(t, "T07", "Jose Reyes", "Riyadh", "Finance", "Accountant", "Asian", false, date(2024, 4, 1)),
            left,
            employee(t, "T09", "Khalid Nasser", "Riyadh", "Operations", "Driver", "Saudi", true, date(2024, 7, 1)),
            employee(t, "T10", "Rahim Uddin", "Jeddah", "Operations", "Driver", "Asian", false, date(2023, 9, 1)),
            employee(l, "L01", "Turki Fahad", "Dammam", "Operations", "Driver", "Saudi", true, date(2021, 1, 1)),
            employee(l, "L02", "Suresh Nair", "Dammam", "Operations", "Driver", "Asian", false, date(2021, 1, 1)),
            employee(l, "L03", "Anil Das", "Dammam", "Operations", "Driver", "Asian", false, date(2022, 1, 1)),
            employee(l, "L04", "Majed Ali", "Dammam", "Operations", "Supervisor", "Saudi", true, date(2023, 1, 1)),
            employee(l, "L05", "Waleed Said", "Dammam", "Admin", "Clerk", "Arab", false, date(2024, 5, 1)),
        ];

        let policies: Vec<PolicyRecord> = serde_yaml::from_str(
            r#"
- id: POL-AT-2023
  company: Alpha Trading
  effective_from: 2023-01-01
  effective_to: 2023-12-31
  default_target_percent: "25"
- id: POL-AT-2024
  company: Alpha Trading
  effective_from: 2024-01-01
  default_target_percent: "30"
  lines:
    - dimension_type: Department
      department: Sales
      target_percent: "35"
    - dimension_type: Designation
      designation: Driver
      target_percent: "20"
    - dimension_type: Department+Designation
      department: Sales
      designation: Sales Manager
      target_percent: "50"
- id: POL-AL-2024
  company: Alpha Logistics
  effective_from: 2024-01-01
  default_target_percent: "20"
"#,
        )
        .unwrap();

        let salary = |id: &str, employee: &str, from: NaiveDate, base: i64, state| SalaryAssignment {
            id: id.to_string(),
            employee: employee.to_string(),
            company: t.to_string(),
            effective_from: from,
            base: Decimal::from(base),
            state,
        };
        let salaries = vec![
            salary("SSA-001", "T01", date(2023, 1, 1), 15_000, AssignmentState::Approved),
            salary("SSA-002", "T01", date(2024, 1, 1), 18_000, AssignmentState::Approved),
            salary("SSA-003", "T02", date(2023, 1, 1), 9_000, AssignmentState::Approved),
            salary("SSA-004", "T03", date(2023, 1, 1), 4_500, AssignmentState::Approved),
            salary("SSA-005", "T04", date(2023, 1, 1), 12_000, AssignmentState::Draft),
            salary("SSA-006", "T05", date(2023, 1, 1), 12_000, AssignmentState::Approved),
        ];

        let companies = vec![
            CompanyNode { id: "Alpha Holding".to_string(), parent: None },
            CompanyNode { id: t.to_string(), parent: Some("Alpha Holding".to_string()) },
            CompanyNode { id: l.to_string(), parent: Some("Alpha Holding".to_string()) },
        ];

        InMemoryStore::new(companies, employees, policies, salaries)
    }
}
