//! Paginated employee list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::RecordFilter;
use crate::error::EngineResult;
use crate::models::EmployeeRecord;
use crate::store::WorkforceStore;

use super::ensure_company;

/// Parameters of the employee list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeListQuery {
    /// Company to list.
    pub company: String,
    /// Employees active on this date are listed.
    pub as_of: NaiveDate,
    /// Equality filters.
    pub filter: RecordFilter,
    /// Case-insensitive substring matched against identifier, name and number.
    pub search: Option<String>,
    /// Page size.
    pub limit: usize,
    /// Rows skipped before the page.
    pub offset: usize,
}

/// One employee in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRow {
    /// Employee identifier.
    pub employee: String,
    /// Display name.
    pub employee_name: Option<String>,
    /// Payroll or badge number.
    pub employee_number: Option<String>,
    /// Branch.
    pub branch: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// Designation.
    pub designation: Option<String>,
    /// National-workforce flag.
    pub is_national: bool,
    /// Nationality.
    pub nationality: Option<String>,
    /// Nationality group tag.
    pub nationality_group: Option<String>,
    /// Date of joining.
    pub hire_date: Option<NaiveDate>,
}

impl From<&EmployeeRecord> for EmployeeRow {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            employee: record.id.clone(),
            employee_name: record.employee_name.clone(),
            employee_number: record.employee_number.clone(),
            branch: record.branch.clone(),
            department: record.department.clone(),
            designation: record.designation.clone(),
            is_national: record.is_national,
            nationality: record.nationality.clone(),
            nationality_group: record.nationality_group.clone(),
            hire_date: record.hire_date,
        }
    }
}

/// One page of the employee list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePage {
    /// Matching employees across all pages.
    pub total: usize,
    /// The requested page.
    pub rows: Vec<EmployeeRow>,
}

fn matches_search(record: &EmployeeRecord, needle: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(needle);
    contains(&record.id)
        || record.employee_name.as_deref().is_some_and(contains)
        || record.employee_number.as_deref().is_some_and(contains)
}

/// Lists employees active on the reference date, sorted by name then identifier.
pub fn employee_list(
    store: &dyn WorkforceStore,
    query: &EmployeeListQuery,
) -> EngineResult<EmployeePage> {
    ensure_company(store, &query.company)?;
    let records = store.employees(&query.company)?;
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matching: Vec<&EmployeeRecord> = records
        .iter()
        .filter(|r| r.is_active_on(query.as_of) && query.filter.matches(r))
        .filter(|r| needle.as_deref().is_none_or(|n| matches_search(r, n)))
        .collect();
    matching.sort_by(|a, b| {
        a.employee_name
            .cmp(&b.employee_name)
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(EmployeePage {
        total: matching.len(),
        rows: matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(EmployeeRow::from)
            .collect(),
    })
}
