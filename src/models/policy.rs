//! Compliance policy models.
//!
//! A [`PolicyRecord`] is one time-versioned target for a company. Its
//! [`PolicyLine`]s override the default target for specific departments,
//! designations or department/designation pairs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which dimension a policy line overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionType {
    /// Override for a department.
    Department,
    /// Override for a designation, across departments.
    Designation,
    /// Override for a designation inside one department.
    #[serde(rename = "Department+Designation")]
    DepartmentDesignation,
}

/// A dimension-scoped target override attached to a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyLine {
    /// The dimension this line overrides.
    pub dimension_type: DimensionType,
    /// Department the line applies to.
    #[serde(default)]
    pub department: Option<String>,
    /// Designation the line applies to.
    #[serde(default)]
    pub designation: Option<String>,
    /// Target percentage for matching rows.
    pub target_percent: Decimal,
    /// Minimum headcount below which matching rows are not reported.
    #[serde(default)]
    pub min_headcount: u32,
}

impl PolicyLine {
    /// Returns true if the populated fields agree with the dimension type.
    ///
    /// Department lines carry only a department, designation lines only a
    /// designation, combined lines carry both.
    pub fn is_consistent(&self) -> bool {
        let has_dept = self.department.as_deref().is_some_and(|d| !d.is_empty());
        let has_desig = self.designation.as_deref().is_some_and(|d| !d.is_empty());
        match self.dimension_type {
            DimensionType::Department => has_dept && !has_desig,
            DimensionType::Designation => has_desig && !has_dept,
            DimensionType::DepartmentDesignation => has_dept && has_desig,
        }
    }
}

/// One version of a company's compliance policy.
///
/// # Example
///
/// ```
/// use workforce_compliance::models::PolicyRecord;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policy = PolicyRecord {
///     id: "POL-2024".to_string(),
///     company: "Acme KSA".to_string(),
///     effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     effective_to: None,
///     default_target_percent: Decimal::new(30, 0),
///     lines: vec![],
/// };
///
/// assert!(policy.covers(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()));
/// assert!(!policy.covers(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    /// Unique identifier of this policy version.
    pub id: String,
    /// Company the policy applies to.
    pub company: String,
    /// First day the policy applies.
    pub effective_from: NaiveDate,
    /// Last day the policy applies (inclusive); open-ended when `None`.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Target percentage when no override matches.
    pub default_target_percent: Decimal,
    /// Dimension-specific overrides.
    #[serde(default)]
    pub lines: Vec<PolicyLine>,
}

impl PolicyRecord {
    /// Returns true if `date` falls inside the effective window.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(dimension_type: DimensionType, dept: Option<&str>, desig: Option<&str>) -> PolicyLine {
        PolicyLine {
            dimension_type,
            department: dept.map(str::to_string),
            designation: desig.map(str::to_string),
            target_percent: Decimal::new(25, 0),
            min_headcount: 0,
        }
    }

    #[test]
    fn test_line_consistency() {
        assert!(line(DimensionType::Department, Some("Sales"), None).is_consistent());
        assert!(!line(DimensionType::Department, None, None).is_consistent());
        assert!(!line(DimensionType::Department, Some("Sales"), Some("Clerk")).is_consistent());
        assert!(line(DimensionType::Designation, None, Some("Clerk")).is_consistent());
        assert!(
            line(DimensionType::DepartmentDesignation, Some("Sales"), Some("Clerk"))
                .is_consistent()
        );
        assert!(!line(DimensionType::DepartmentDesignation, Some("Sales"), None).is_consistent());
    }

    #[test]
    fn test_effective_to_is_inclusive() {
        let policy = PolicyRecord {
            id: "POL-1".to_string(),
            company: "Acme".to_string(),
            effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            effective_to: NaiveDate::from_ymd_opt(2024, 12, 31),
            default_target_percent: Decimal::new(30, 0),
            lines: vec![],
        };
        assert!(policy.covers(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!policy.covers(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn test_dimension_type_serialization() {
        assert_eq!(
            serde_json::to_string(&DimensionType::DepartmentDesignation).unwrap(),
            "\"Department+Designation\""
        );
        let parsed: DimensionType = serde_yaml::from_str("Designation").unwrap();
        assert_eq!(parsed, DimensionType::Designation);
    }

    #[test]
    fn test_deserialize_policy_with_lines() {
        let yaml = r#"
id: POL-2024
company: Acme KSA
effective_from: 2024-01-01
default_target_percent: "30"
lines:
  - dimension_type: Department
    department: Finance
    target_percent: "45"
    min_headcount: 5
"#;
        let policy: PolicyRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.effective_to, None);
        assert_eq!(policy.lines.len(), 1);
        assert_eq!(policy.lines[0].min_headcount, 5);
        assert_eq!(policy.lines[0].target_percent, Decimal::new(45, 0));
    }
}
