//! Policy resolution.
//!
//! Finds the policy version in force on a date and resolves the target for a
//! dimension through an explicit layered lookup:
//!
//! 1. Department + Designation override
//! 2. Designation override
//! 3. Department override
//! 4. Policy default
//!
//! The lookup tables are built per call from the policy's lines; nothing is
//! shared between calls.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{DimensionType, PolicyRecord};

/// The dimension values a target is being resolved for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionFilter<'a> {
    /// Department of the row, if the row is department-specific.
    pub department: Option<&'a str>,
    /// Designation of the row, if the row is designation-specific.
    pub designation: Option<&'a str>,
}

impl<'a> DimensionFilter<'a> {
    /// No dimension: resolves to the policy default.
    pub fn none() -> Self {
        Self::default()
    }

    /// A department row.
    pub fn department(department: &'a str) -> Self {
        Self {
            department: Some(department),
            designation: None,
        }
    }

    /// A designation row.
    pub fn designation(designation: &'a str) -> Self {
        Self {
            department: None,
            designation: Some(designation),
        }
    }

    /// A department × designation row.
    pub fn pair(department: &'a str, designation: &'a str) -> Self {
        Self {
            department: Some(department),
            designation: Some(designation),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OverrideEntry {
    target_percent: Decimal,
    min_headcount: u32,
}

/// Layered override tables for one policy version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOverrides {
    default_target: Decimal,
    by_pair: BTreeMap<(String, String), OverrideEntry>,
    by_designation: BTreeMap<String, OverrideEntry>,
    by_department: BTreeMap<String, OverrideEntry>,
}

impl TargetOverrides {
    /// Builds the tables from a policy's lines.
    ///
    /// Lines whose populated fields contradict their dimension type are
    /// ignored. When two lines share a key, the first one listed wins.
    pub fn from_policy(policy: &PolicyRecord) -> Self {
        let mut overrides = Self {
            default_target: policy.default_target_percent,
            by_pair: BTreeMap::new(),
            by_designation: BTreeMap::new(),
            by_department: BTreeMap::new(),
        };

        for line in policy.lines.iter().filter(|l| l.is_consistent()) {
            let entry = OverrideEntry {
                target_percent: line.target_percent,
                min_headcount: line.min_headcount,
            };
            let department = line.department.clone().unwrap_or_default();
            let designation = line.designation.clone().unwrap_or_default();
            match line.dimension_type {
                DimensionType::DepartmentDesignation => {
                    overrides
                        .by_pair
                        .entry((department, designation))
                        .or_insert(entry);
                }
                DimensionType::Designation => {
                    overrides.by_designation.entry(designation).or_insert(entry);
                }
                DimensionType::Department => {
                    overrides.by_department.entry(department).or_insert(entry);
                }
            }
        }

        overrides
    }

    /// The policy's default target.
    pub fn default_target(&self) -> Decimal {
        self.default_target
    }

    fn lookup(&self, filter: DimensionFilter<'_>) -> Option<&OverrideEntry> {
        let pair = match (filter.department, filter.designation) {
            (Some(dept), Some(desig)) => self
                .by_pair
                .get(&(dept.to_string(), desig.to_string())),
            _ => None,
        };
        pair.or_else(|| filter.designation.and_then(|g| self.by_designation.get(g)))
            .or_else(|| filter.department.and_then(|d| self.by_department.get(d)))
    }

    /// Resolves the target for a dimension, falling through to the default.
    pub fn target_for(&self, filter: DimensionFilter<'_>) -> Decimal {
        self.lookup(filter)
            .map_or(self.default_target, |entry| entry.target_percent)
    }

    /// Minimum headcount demanded by the most specific matching line, or 0.
    pub fn min_headcount_for(&self, filter: DimensionFilter<'_>) -> u32 {
        self.lookup(filter).map_or(0, |entry| entry.min_headcount)
    }
}

/// Selects the policy of `company` in force on `as_of`.
///
/// Among versions whose window covers the date, the one with the latest
/// `effective_from` wins. Two versions starting on the same day should not
/// exist; if they do, the one with the lowest identifier is chosen.
pub fn active_policy<'a>(
    policies: &'a [PolicyRecord],
    company: &str,
    as_of: NaiveDate,
) -> Option<&'a PolicyRecord> {
    policies
        .iter()
        .filter(|p| p.company == company && p.covers(as_of))
        .max_by(|a, b| {
            a.effective_from
                .cmp(&b.effective_from)
                .then_with(|| b.id.cmp(&a.id))
        })
}

/// Resolves the overrides of the policy in force, `None` when no policy applies.
pub fn resolve_overrides(
    policies: &[PolicyRecord],
    company: &str,
    as_of: NaiveDate,
) -> Option<TargetOverrides> {
    active_policy(policies, company, as_of).map(TargetOverrides::from_policy)
}

/// Resolves the target for a dimension of `company` on `as_of`.
///
/// Returns `None` when no policy is in force: the target is unknown, which is
/// different from a target of zero.
///
/// # Example
///
/// ```
/// use workforce_compliance::engine::{target_for, DimensionFilter};
/// use workforce_compliance::models::PolicyRecord;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policies = vec![PolicyRecord {
///     id: "POL-1".to_string(),
///     company: "Acme".to_string(),
///     effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     effective_to: None,
///     default_target_percent: Decimal::new(50, 0),
///     lines: vec![],
/// }];
///
/// let june = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
/// assert_eq!(target_for(&policies, "Acme", june, DimensionFilter::none()), Some(Decimal::new(50, 0)));
///
/// let before = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
/// assert_eq!(target_for(&policies, "Acme", before, DimensionFilter::none()), None);
/// ```
pub fn target_for(
    policies: &[PolicyRecord],
    company: &str,
    as_of: NaiveDate,
    filter: DimensionFilter<'_>,
) -> Option<Decimal> {
    resolve_overrides(policies, company, as_of).map(|o| o.target_for(filter))
}
