//! Rollup and aggregation.
//!
//! Groups employee records by one or two dimensions, drops groups that are
//! too small to report, attaches policy targets and ranks the result.
//!
//! Ranking is worst-first: ascending variance (unknown variance last), then
//! ascending composition, then descending headcount, then labels. Caps are
//! applied by the caller after ranking.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{AggregateRow, EmployeeRecord};

use super::classify::{ClassificationMode, classify};
use super::policy::{DimensionFilter, TargetOverrides};
use super::salary_band::SalaryIndex;
use super::snapshot::Snapshot;

/// Label used for records with no value for a grouped dimension.
pub const UNASSIGNED_LABEL: &str = "Not Set";

/// A categorical grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Department.
    Department,
    /// Designation.
    Designation,
    /// Branch.
    Branch,
    /// Nationality group tag.
    NationalityGroup,
    /// Salary band of the latest approved assignment.
    SalaryBand,
}

/// How records are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grouping {
    /// One dimension.
    By(Dimension),
    /// Department × designation.
    DepartmentDesignation,
}

/// Which records are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    /// Records whose status is `Active`.
    Current,
    /// Records active as of the date, by hire/termination dates.
    AsOf(NaiveDate),
}

impl Population {
    fn includes(&self, record: &EmployeeRecord) -> bool {
        match self {
            Population::Current => record.is_current(),
            Population::AsOf(date) => record.is_active_on(*date),
        }
    }
}

/// Treatment of records with no value for a grouped dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unassigned {
    /// Leave them out.
    Skip,
    /// Group them under [`UNASSIGNED_LABEL`].
    Group,
}

/// Equality filters applied before grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Branch equals.
    pub branch: Option<String>,
    /// Department equals.
    pub department: Option<String>,
    /// Designation equals.
    pub designation: Option<String>,
    /// Nationality group equals.
    pub nationality_group: Option<String>,
    /// National-workforce flag equals.
    pub is_national: Option<bool>,
}

impl RecordFilter {
    /// Returns true if the record passes every filter that is set.
    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        fn eq(filter: &Option<String>, value: &Option<String>) -> bool {
            filter.as_ref().is_none_or(|f| value.as_ref() == Some(f))
        }

        eq(&self.branch, &record.branch)
            && eq(&self.department, &record.department)
            && eq(&self.designation, &record.designation)
            && eq(&self.nationality_group, &record.nationality_group)
            && self.is_national.is_none_or(|n| record.is_national == n)
    }
}

/// Parameters of one rollup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupQuery {
    /// Grouping key(s).
    pub grouping: Grouping,
    /// Which records count.
    pub population: Population,
    /// Filters applied before grouping.
    pub filter: RecordFilter,
    /// Groups with fewer employees are dropped.
    pub min_headcount: u32,
    /// Treatment of missing dimension values.
    pub unassigned: Unassigned,
}

impl RollupQuery {
    /// A query over the current population with no filters.
    pub fn new(grouping: Grouping) -> Self {
        Self {
            grouping,
            population: Population::Current,
            filter: RecordFilter::default(),
            min_headcount: 0,
            unassigned: Unassigned::Group,
        }
    }

    /// Counts the population as of `date` instead of current status.
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.population = Population::AsOf(date);
        self
    }

    /// Replaces the record filter.
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the minimum group headcount.
    pub fn min_headcount(mut self, min_headcount: u32) -> Self {
        self.min_headcount = min_headcount;
        self
    }

    /// Leaves out records with no value for a grouped dimension.
    pub fn skip_unassigned(mut self) -> Self {
        self.unassigned = Unassigned::Skip;
        self
    }
}

fn dimension_value(
    record: &EmployeeRecord,
    dimension: Dimension,
    salaries: &SalaryIndex,
) -> Option<(u8, String)> {
    let value = match dimension {
        Dimension::Department => record.department.as_deref(),
        Dimension::Designation => record.designation.as_deref(),
        Dimension::Branch => record.branch.as_deref(),
        Dimension::NationalityGroup => record.nationality_group.as_deref(),
        Dimension::SalaryBand => {
            let band = salaries.band_for(&record.id);
            return Some((band.ordinal(), band.label().to_string()));
        }
    };
    value
        .filter(|v| !v.is_empty())
        .map(|v| (0, v.to_string()))
}

fn label_or_unassigned(value: Option<(u8, String)>, unassigned: Unassigned) -> Option<(u8, String)> {
    match (value, unassigned) {
        (Some(v), _) => Some(v),
        (None, Unassigned::Group) => Some((0, UNASSIGNED_LABEL.to_string())),
        (None, Unassigned::Skip) => None,
    }
}

type GroupKey = (u8, String, Option<String>);

fn group_key(
    record: &EmployeeRecord,
    query: &RollupQuery,
    salaries: &SalaryIndex,
) -> Option<GroupKey> {
    match query.grouping {
        Grouping::By(dimension) => {
            let (order, label) =
                label_or_unassigned(dimension_value(record, dimension, salaries), query.unassigned)?;
            Some((order, label, None))
        }
        Grouping::DepartmentDesignation => {
            let (_, department) = label_or_unassigned(
                dimension_value(record, Dimension::Department, salaries),
                query.unassigned,
            )?;
            let (_, designation) = label_or_unassigned(
                dimension_value(record, Dimension::Designation, salaries),
                query.unassigned,
            )?;
            Some((0, department, Some(designation)))
        }
    }
}

/// Groups the records and drops groups below the minimum headcount.
///
/// Rows come back in natural order: alphabetical by label(s), except salary
/// bands which follow band order. No targets are attached.
///
/// # Example
///
/// ```
/// use workforce_compliance::engine::{aggregate, Dimension, Grouping, RollupQuery, SalaryIndex};
/// use workforce_compliance::models::{EmployeeRecord, EmploymentStatus};
///
/// let employee = |id: &str, dept: &str, national: bool| EmployeeRecord {
///     id: id.to_string(),
///     company: "Acme".to_string(),
///     branch: None,
///     department: Some(dept.to_string()),
///     designation: None,
///     nationality_group: None,
///     is_national: national,
///     hire_date: None,
///     termination_date: None,
///     status: EmploymentStatus::Active,
///     employee_name: None,
///     employee_number: None,
///     nationality: None,
/// };
///
/// let records = vec![
///     employee("E1", "Sales", true),
///     employee("E2", "Sales", false),
///     employee("E3", "Finance", false),
/// ];
/// let query = RollupQuery::new(Grouping::By(Dimension::Department)).min_headcount(2);
/// let rows = aggregate(&records, &SalaryIndex::default(), &query);
///
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].label, "Sales");
/// assert_eq!(rows[0].composition_percent.to_string(), "50.0");
/// ```
pub fn aggregate(
    records: &[EmployeeRecord],
    salaries: &SalaryIndex,
    query: &RollupQuery,
) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<GroupKey, Vec<&EmployeeRecord>> = BTreeMap::new();

    for record in records
        .iter()
        .filter(|r| query.population.includes(r) && query.filter.matches(r))
    {
        if let Some(key) = group_key(record, query, salaries) {
            groups.entry(key).or_default().push(record);
        }
    }

    groups
        .into_iter()
        .filter_map(|((_, label, sub_label), members)| {
            let snap = Snapshot::tally(members);
            (snap.total >= query.min_headcount).then(|| AggregateRow {
                label,
                sub_label,
                headcount: snap.total,
                national_count: snap.national_count,
                non_national_count: snap.non_national_count,
                composition_percent: snap.composition_percent,
                target_percent: None,
                variance_percent: None,
                status: None,
            })
        })
        .collect()
}

fn row_filter<'a>(
    grouping: Grouping,
    row: &'a AggregateRow,
    fixed: DimensionFilter<'a>,
) -> DimensionFilter<'a> {
    match grouping {
        Grouping::By(Dimension::Department) => DimensionFilter {
            department: Some(row.label.as_str()),
            designation: fixed.designation,
        },
        Grouping::By(Dimension::Designation) => DimensionFilter {
            department: fixed.department,
            designation: Some(row.label.as_str()),
        },
        Grouping::DepartmentDesignation => DimensionFilter {
            department: Some(row.label.as_str()),
            designation: row.sub_label.as_deref(),
        },
        Grouping::By(_) => fixed,
    }
}

/// Attaches targets, variances and statuses to rollup rows.
///
/// Each row's target is resolved through the policy's layered overrides
/// using the row's own dimension values, completed by `fixed` (e.g. the
/// department a designation breakdown is drilled into). Rows below a
/// line's minimum-headcount override are dropped. With no policy every
/// target stays unknown.
pub fn attach_targets(
    rows: Vec<AggregateRow>,
    grouping: Grouping,
    overrides: Option<&TargetOverrides>,
    fixed: DimensionFilter<'_>,
    mode: ClassificationMode,
) -> Vec<AggregateRow> {
    rows.into_iter()
        .filter_map(|mut row| {
            let (target, min_headcount) = match overrides {
                Some(o) => {
                    let filter = row_filter(grouping, &row, fixed);
                    (Some(o.target_for(filter)), o.min_headcount_for(filter))
                }
                None => (None, 0),
            };
            if row.headcount < min_headcount {
                return None;
            }
            let result = classify(row.composition_percent, target, mode);
            row.target_percent = target;
            row.variance_percent = result.variance;
            row.status = result.status;
            Some(row)
        })
        .collect()
}

fn compare_variance(a: &AggregateRow, b: &AggregateRow) -> Ordering {
    match (a.variance_percent, b.variance_percent) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Worst-first comparison of two rows.
pub fn worst_first(a: &AggregateRow, b: &AggregateRow) -> Ordering {
    compare_variance(a, b)
        .then_with(|| a.composition_percent.cmp(&b.composition_percent))
        .then_with(|| b.headcount.cmp(&a.headcount))
        .then_with(|| a.label.cmp(&b.label))
        .then_with(|| a.sub_label.cmp(&b.sub_label))
}

/// Sorts rows worst-first.
pub fn rank_worst_first(rows: &mut [AggregateRow]) {
    rows.sort_by(worst_first);
}

/// Sorts rows by descending headcount, then label.
pub fn rank_by_headcount(rows: &mut [AggregateRow]) {
    rows.sort_by(|a, b| {
        b.headcount
            .cmp(&a.headcount)
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.sub_label.cmp(&b.sub_label))
    });
}
