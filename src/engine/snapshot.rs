//! Point-in-time workforce snapshots.
//!
//! Reconstructs who was employed on a given date from hire and termination
//! dates alone. Attributes such as department or branch are taken from the
//! record as it is today; a transfer mid-tenure is invisible to historical
//! snapshots.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::EmployeeRecord;
use crate::store::WorkforceStore;

use super::percent::share_percent;

/// A company, optionally narrowed to one branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Company identifier.
    pub company: String,
    /// Branch filter.
    pub branch: Option<String>,
}

impl Scope {
    /// Scope covering a whole company.
    pub fn company(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            branch: None,
        }
    }

    /// Scope covering one branch of a company.
    pub fn branch(company: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            branch: Some(branch.into()),
        }
    }

    /// Returns true if the record falls inside this scope.
    pub fn contains(&self, record: &EmployeeRecord) -> bool {
        record.in_scope(&self.company, self.branch.as_deref())
    }
}

/// Headcount and composition at one instant.
///
/// `total == national_count + non_national_count` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Employees counted.
    pub total: u32,
    /// Employees flagged as national workforce.
    pub national_count: u32,
    /// Employees not flagged as national workforce.
    pub non_national_count: u32,
    /// `round(100 * national / total, 1)`, `0.0` when empty.
    pub composition_percent: Decimal,
}

impl Snapshot {
    /// Builds a snapshot from raw counts.
    ///
    /// A national count above `total` is capped at `total`.
    pub fn from_counts(national_count: u32, total: u32) -> Self {
        let national_count = national_count.min(total);
        Self {
            total,
            national_count,
            non_national_count: total.saturating_sub(national_count),
            composition_percent: share_percent(national_count, total),
        }
    }

    /// Counts every record yielded by the iterator.
    pub fn tally<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a EmployeeRecord>,
    {
        let (national, total) = records.into_iter().fold((0u32, 0u32), |(n, t), e| {
            (n + u32::from(e.is_national), t + 1)
        });
        Self::from_counts(national, total)
    }

    /// Pools several snapshots into one, recomputing the composition.
    pub fn pooled<I>(snapshots: I) -> Self
    where
        I: IntoIterator<Item = Snapshot>,
    {
        let (national, total) = snapshots
            .into_iter()
            .fold((0u32, 0u32), |(n, t), s| (n + s.national_count, t + s.total));
        Self::from_counts(national, total)
    }

    /// Snapshot of no employees.
    pub fn empty() -> Self {
        Self::from_counts(0, 0)
    }
}

/// Computes the snapshot of `scope` as of `as_of`.
///
/// A record counts when it belongs to the scope and was active on the date
/// (hired on or before it, not relieved on or before it). The employment
/// status field is ignored.
///
/// # Example
///
/// ```
/// use workforce_compliance::engine::{snapshot, Scope};
/// use workforce_compliance::models::{EmployeeRecord, EmploymentStatus};
/// use chrono::NaiveDate;
///
/// let hire = |id: &str, national: bool| EmployeeRecord {
///     id: id.to_string(),
///     company: "Acme".to_string(),
///     branch: None,
///     department: None,
///     designation: None,
///     nationality_group: None,
///     is_national: national,
///     hire_date: NaiveDate::from_ymd_opt(2024, 1, 1),
///     termination_date: None,
///     status: EmploymentStatus::Active,
///     employee_name: None,
///     employee_number: None,
///     nationality: None,
/// };
///
/// let records = vec![hire("E1", true), hire("E2", false), hire("E3", false)];
/// let snap = snapshot(&records, &Scope::company("Acme"), NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
/// assert_eq!(snap.total, 3);
/// assert_eq!(snap.composition_percent.to_string(), "33.3");
/// ```
pub fn snapshot(records: &[EmployeeRecord], scope: &Scope, as_of: NaiveDate) -> Snapshot {
    Snapshot::tally(
        records
            .iter()
            .filter(|e| scope.contains(e) && e.is_active_on(as_of)),
    )
}

/// Reads the scope's company from the store and computes its snapshot.
pub fn snapshot_from_store(
    store: &dyn WorkforceStore,
    scope: &Scope,
    as_of: NaiveDate,
) -> EngineResult<Snapshot> {
    let records = store.employees(&scope.company)?;
    Ok(snapshot(&records, scope, as_of))
}
