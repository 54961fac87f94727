//! Employee record model.
//!
//! This module defines [`EmployeeRecord`], the read-only row the engine
//! consumes from the record store, and the [`EmploymentStatus`] enum.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The current employment status held by the record store.
///
/// Only `Active` records take part in current-state aggregates. Point-in-time
/// snapshots ignore the status and rely on hire/termination dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmploymentStatus {
    /// Currently employed.
    #[default]
    Active,
    /// Temporarily inactive (e.g. long leave).
    Inactive,
    /// Suspended pending review.
    Suspended,
    /// No longer employed.
    Left,
}

/// A single employee as stored by the external record store.
///
/// Categorical attributes are optional: a record with no department simply
/// has no department, there is no attribute probing.
///
/// # Example
///
/// ```
/// use workforce_compliance::models::{EmployeeRecord, EmploymentStatus};
/// use chrono::NaiveDate;
///
/// let employee = EmployeeRecord {
///     id: "EMP-0001".to_string(),
///     company: "Acme KSA".to_string(),
///     branch: Some("Riyadh".to_string()),
///     department: Some("Finance".to_string()),
///     designation: Some("Accountant".to_string()),
///     nationality_group: Some("Saudi".to_string()),
///     is_national: true,
///     hire_date: NaiveDate::from_ymd_opt(2024, 7, 1),
///     termination_date: None,
///     status: EmploymentStatus::Active,
///     employee_name: None,
///     employee_number: None,
///     nationality: None,
/// };
///
/// assert!(!employee.is_active_on(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()));
/// assert!(employee.is_active_on(NaiveDate::from_ymd_opt(2024, 7, 31).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employing company.
    pub company: String,
    /// Branch (site) the employee is attached to.
    #[serde(default)]
    pub branch: Option<String>,
    /// Department the employee belongs to.
    #[serde(default)]
    pub department: Option<String>,
    /// Job designation.
    #[serde(default)]
    pub designation: Option<String>,
    /// Reporting nationality group tag (e.g. "Saudi", "GCC", "Asian").
    #[serde(default)]
    pub nationality_group: Option<String>,
    /// Whether the employee counts towards the national workforce.
    #[serde(default)]
    pub is_national: bool,
    /// Date of joining. A missing hire date counts as hired before any date.
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    /// Relieving date, if the employee has left.
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
    /// Current employment status.
    #[serde(default)]
    pub status: EmploymentStatus,
    /// Display name.
    #[serde(default)]
    pub employee_name: Option<String>,
    /// Payroll or badge number.
    #[serde(default)]
    pub employee_number: Option<String>,
    /// Nationality (country), informational only.
    #[serde(default)]
    pub nationality: Option<String>,
}

impl EmployeeRecord {
    /// Returns true if the employee was employed on `date`.
    ///
    /// Hired on or before the date and not yet relieved: a termination date
    /// equal to `date` means the employee is already gone.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        let hired = self.hire_date.is_none_or(|hired| hired <= date);
        let not_relieved = self.termination_date.is_none_or(|left| left > date);
        hired && not_relieved
    }

    /// Returns true if the record counts in current-state aggregates.
    pub fn is_current(&self) -> bool {
        self.status == EmploymentStatus::Active
    }

    /// Returns true if the record belongs to `company` and, when given, `branch`.
    pub fn in_scope(&self, company: &str, branch: Option<&str>) -> bool {
        self.company == company
            && branch.is_none_or(|b| self.branch.as_deref() == Some(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_employee() -> EmployeeRecord {
        EmployeeRecord {
            id: "EMP-0001".to_string(),
            company: "Acme KSA".to_string(),
            branch: Some("Riyadh".to_string()),
            department: Some("Finance".to_string()),
            designation: Some("Accountant".to_string()),
            nationality_group: Some("Saudi".to_string()),
            is_national: true,
            hire_date: Some(date(2022, 3, 1)),
            termination_date: None,
            status: EmploymentStatus::Active,
            employee_name: Some("Sara Al-Harbi".to_string()),
            employee_number: Some("1001".to_string()),
            nationality: Some("Saudi Arabia".to_string()),
        }
    }

    #[test]
    fn test_active_on_hire_date() {
        let employee = create_test_employee();
        assert!(employee.is_active_on(date(2022, 3, 1)));
        assert!(!employee.is_active_on(date(2022, 2, 28)));
    }

    #[test]
    fn test_termination_date_is_exclusive() {
        let mut employee = create_test_employee();
        employee.termination_date = Some(date(2024, 5, 31));

        assert!(employee.is_active_on(date(2024, 5, 30)));
        assert!(!employee.is_active_on(date(2024, 5, 31)));
        assert!(!employee.is_active_on(date(2024, 6, 30)));
    }

    #[test]
    fn test_missing_hire_date_counts_as_hired() {
        let mut employee = create_test_employee();
        employee.hire_date = None;
        assert!(employee.is_active_on(date(1990, 1, 1)));
    }

    #[test]
    fn test_status_does_not_affect_point_in_time() {
        let mut employee = create_test_employee();
        employee.status = EmploymentStatus::Left;

        assert!(employee.is_active_on(date(2023, 1, 1)));
        assert!(!employee.is_current());
    }

    #[test]
    fn test_in_scope_matches_company_and_branch() {
        let employee = create_test_employee();
        assert!(employee.in_scope("Acme KSA", None));
        assert!(employee.in_scope("Acme KSA", Some("Riyadh")));
        assert!(!employee.in_scope("Acme KSA", Some("Jeddah")));
        assert!(!employee.in_scope("Other Co", None));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let yaml = r#"
id: EMP-0002
company: Acme KSA
department: Sales
hire_date: 2023-01-15
"#;
        let employee: EmployeeRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(employee.status, EmploymentStatus::Active);
        assert!(!employee.is_national);
        assert_eq!(employee.branch, None);
        assert_eq!(employee.hire_date, Some(date(2023, 1, 15)));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EmploymentStatus::Left).unwrap(),
            "\"Left\""
        );
    }
}
