//! Monthly trend series.
//!
//! Builds a contiguous first-of-month grid ending at the month of the
//! reference date and measures every month at its last calendar day.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ChartDataset, ChartPayload};

use super::percent::{round_percent, weighted_average};
use super::policy::{DimensionFilter, target_for};
use super::scope::CompanyData;
use super::snapshot::{Scope, Snapshot, snapshot};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Last day of the month containing `date`.
///
/// ```
/// use workforce_compliance::engine::month_end;
/// use chrono::NaiveDate;
///
/// let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
/// assert_eq!(month_end(feb), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Last day of the month before the one containing `date`.
pub fn previous_month_end(date: NaiveDate) -> NaiveDate {
    month_start(date).pred_opt().unwrap_or(NaiveDate::MIN)
}

/// Month label, `YYYY-MM`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// First-of-month dates, oldest first, ending at the month of `as_of`.
///
/// Always yields at least one month.
pub fn month_grid(as_of: NaiveDate, months_back: u32) -> Vec<NaiveDate> {
    let last = month_start(as_of);
    (0..months_back.max(1))
        .rev()
        .filter_map(|k| last.checked_sub_months(Months::new(k)))
        .collect()
}

/// Pooled snapshot and weighted target of a set of companies at one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopePoint {
    /// Headcount and composition pooled over all companies.
    pub snapshot: Snapshot,
    /// Headcount-weighted target over companies with a known target and
    /// nonzero headcount, `None` when no company qualifies.
    pub target_percent: Option<Decimal>,
}

/// Measures a company set at `as_of`, optionally narrowed to one branch.
pub fn scope_point(companies: &[CompanyData], branch: Option<&str>, as_of: NaiveDate) -> ScopePoint {
    let measured: Vec<(Snapshot, Option<Decimal>)> = companies
        .iter()
        .map(|data| {
            let scope = Scope {
                company: data.company.clone(),
                branch: branch.map(str::to_string),
            };
            (
                snapshot(&data.employees, &scope, as_of),
                target_for(&data.policies, &data.company, as_of, DimensionFilter::none()),
            )
        })
        .collect();

    ScopePoint {
        snapshot: Snapshot::pooled(measured.iter().map(|(snap, _)| *snap)),
        target_percent: weighted_average(
            measured
                .iter()
                .filter_map(|(snap, target)| target.map(|t| (t, snap.total))),
        ),
    }
}

/// Change in composition between two snapshots, rounded to 1 dp.
///
/// `None` when the earlier snapshot has no employees.
pub fn month_over_month(current: &Snapshot, previous: &Snapshot) -> Option<Decimal> {
    (previous.total > 0)
        .then(|| round_percent(current.composition_percent - previous.composition_percent))
}

/// Monthly composition series of a company set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendSeries {
    /// Month labels, `YYYY-MM`, oldest first.
    pub labels: Vec<String>,
    /// Pooled composition per month.
    pub actual_values: Vec<Decimal>,
    /// Weighted target per month, `None` when unknown.
    pub target_values: Vec<Option<Decimal>>,
    /// National headcount per month.
    pub national_counts: Vec<u32>,
    /// Non-national headcount per month.
    pub non_national_counts: Vec<u32>,
    /// Composition change over the last two months.
    pub month_over_month: Option<Decimal>,
}

/// Builds the monthly trend of a company set.
pub fn trend(
    companies: &[CompanyData],
    branch: Option<&str>,
    as_of: NaiveDate,
    months_back: u32,
) -> TrendSeries {
    let mut series = TrendSeries::default();
    let mut snapshots = Vec::new();

    for month in month_grid(as_of, months_back) {
        let point = scope_point(companies, branch, month_end(month));
        series.labels.push(month_label(month));
        series.actual_values.push(point.snapshot.composition_percent);
        series.target_values.push(point.target_percent);
        series.national_counts.push(point.snapshot.national_count);
        series.non_national_counts.push(point.snapshot.non_national_count);
        snapshots.push(point.snapshot);
    }

    series.month_over_month = match snapshots.as_slice() {
        [.., previous, current] => month_over_month(current, previous),
        _ => None,
    };
    series
}

/// Branches of a company ranked by headcount at `as_of`, ties by name.
pub fn top_branches(data: &CompanyData, as_of: NaiveDate, limit: usize) -> Vec<String> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for record in data.employees.iter().filter(|e| e.is_active_on(as_of)) {
        if let Some(branch) = record.branch.as_deref().filter(|b| !b.is_empty()) {
            *counts.entry(branch).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&str, u32)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(branch, _)| branch.to_string())
        .collect()
}

/// Per-branch composition series of one company.
///
/// Branches are the top `limit` by headcount at the end of the `as_of`
/// month; each gets one dataset aligned with the month grid.
pub fn branch_series(
    data: &CompanyData,
    as_of: NaiveDate,
    months_back: u32,
    limit: usize,
) -> ChartPayload {
    let grid = month_grid(as_of, months_back);
    let datasets = top_branches(data, month_end(as_of), limit)
        .into_iter()
        .map(|branch| {
            let scope = Scope::branch(data.company.clone(), branch.clone());
            ChartDataset {
                values: grid
                    .iter()
                    .map(|month| Some(snapshot(&data.employees, &scope, month_end(*month)).composition_percent))
                    .collect(),
                name: branch,
            }
        })
        .collect();

    ChartPayload {
        labels: grid.into_iter().map(month_label).collect(),
        datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeRecord, EmploymentStatus, PolicyRecord};
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee(company: &str, id: &str, branch: &str, national: bool, hired: NaiveDate) -> EmployeeRecord {
        EmployeeRecord {
            id: id.to_string(),
            company: company.to_string(),
            branch: Some(branch.to_string()),
            department: None,
            designation: None,
            nationality_group: None,
            is_national: national,
            hire_date: Some(hired),
            termination_date: None,
            status: EmploymentStatus::Active,
            employee_name: None,
            employee_number: None,
            nationality: None,
        }
    }

    fn policy(company: &str, target: &str) -> PolicyRecord {
        PolicyRecord {
            id: format!("POL-{}", company),
            company: company.to_string(),
            effective_from: date(2024, 1, 1),
            effective_to: None,
            default_target_percent: dec(target),
            lines: vec![],
        }
    }

    fn company(name: &str, national: usize, total: usize, target: Option<&str>) -> CompanyData {
        CompanyData {
            company: name.to_string(),
            employees: (0..total)
                .map(|i| employee(name, &format!("{}-{}", name, i), "Main", i < national, date(2023, 1, 1)))
                .collect(),
            policies: target.map(|t| vec![policy(name, t)]).unwrap_or_default(),
        }
    }

    #[test]
    fn test_month_grid_is_oldest_first_and_inclusive() {
        let grid = month_grid(date(2024, 3, 15), 3);
        assert_eq!(grid, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
    }

    #[test]
    fn test_month_grid_has_at_least_one_month() {
        assert_eq!(month_grid(date(2024, 3, 15), 0), vec![date(2024, 3, 1)]);
    }

    #[test]
    fn test_month_grid_crosses_year_boundary() {
        let labels: Vec<String> = month_grid(date(2024, 2, 1), 3).into_iter().map(month_label).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_previous_month_end() {
        assert_eq!(previous_month_end(date(2024, 3, 15)), date(2024, 2, 29));
        assert_eq!(previous_month_end(date(2024, 1, 1)), date(2023, 12, 31));
    }

    #[test]
    fn test_weighted_target_across_companies() {
        let companies = vec![
            company("A", 3, 8, Some("30")),
            company("B", 2, 5, Some("20")),
        ];
        let point = scope_point(&companies, None, date(2024, 6, 30));
        assert_eq!(point.snapshot.composition_percent, dec("38.5"));
        assert_eq!(point.target_percent, Some(dec("26.2")));
    }

    #[test]
    fn test_target_unknown_when_no_company_has_policy() {
        let companies = vec![company("A", 3, 8, None)];
        let point = scope_point(&companies, None, date(2024, 6, 30));
        assert_eq!(point.target_percent, None);
    }

    #[test]
    fn test_company_without_target_does_not_dilute_weighted_target() {
        let companies = vec![company("A", 3, 8, Some("30")), company("B", 2, 5, None)];
        let point = scope_point(&companies, None, date(2024, 6, 30));
        assert_eq!(point.target_percent, Some(dec("30.0")));
        assert_eq!(point.snapshot.total, 13);
    }

    #[test]
    fn test_trend_measures_month_ends_and_month_over_month() {
        let mut data = company("A", 3, 8, Some("30"));
        data.employees.push(employee("A", "A-july", "Main", true, date(2024, 7, 1)));
        let series = trend(&[data], None, date(2024, 7, 15), 2);

        assert_eq!(series.labels, vec!["2024-06", "2024-07"]);
        assert_eq!(series.actual_values, vec![dec("37.5"), dec("44.4")]);
        assert_eq!(series.target_values, vec![Some(dec("30.0")), Some(dec("30.0"))]);
        assert_eq!(series.national_counts, vec![3, 4]);
        assert_eq!(series.month_over_month, Some(dec("6.9")));
    }

    #[test]
    fn test_month_over_month_undefined_for_single_month_or_empty_previous() {
        let data = company("A", 3, 8, Some("30"));
        assert_eq!(trend(std::slice::from_ref(&data), None, date(2024, 7, 15), 1).month_over_month, None);

        let mut late = company("B", 0, 0, None);
        late.employees.push(employee("B", "B-1", "Main", true, date(2024, 7, 1)));
        assert_eq!(trend(&[late], None, date(2024, 7, 15), 2).month_over_month, None);
    }

    #[test]
    fn test_empty_scope_trend_is_zero_not_error() {
        let series = trend(&[], None, date(2024, 7, 15), 3);
        assert_eq!(series.labels.len(), 3);
        assert!(series.actual_values.iter().all(|v| v.is_zero()));
        assert!(series.target_values.iter().all(Option::is_none));
    }

    #[test]
    fn test_top_branches_ranked_by_headcount_then_name() {
        let mut data = company("A", 0, 0, None);
        for (i, branch) in ["Jeddah", "Riyadh", "Riyadh", "Dammam", "Abha"].iter().enumerate() {
            data.employees.push(employee("A", &format!("E{}", i), branch, false, date(2023, 1, 1)));
        }
        assert_eq!(
            top_branches(&data, date(2024, 1, 31), 3),
            vec!["Riyadh", "Abha", "Dammam"]
        );
    }

    #[test]
    fn test_branch_series_aligns_with_grid() {
        let mut data = company("A", 0, 0, None);
        data.employees.push(employee("A", "E1", "Riyadh", true, date(2023, 1, 1)));
        data.employees.push(employee("A", "E2", "Riyadh", false, date(2024, 2, 1)));
        data.employees.push(employee("A", "E3", "Jeddah", false, date(2023, 1, 1)));

        let chart = branch_series(&data, date(2024, 2, 10), 2, 6);
        assert_eq!(chart.labels, vec!["2024-01", "2024-02"]);
        assert_eq!(chart.datasets[0].name, "Riyadh");
        assert_eq!(chart.datasets[0].values, vec![Some(dec("100.0")), Some(dec("50.0"))]);
        assert_eq!(chart.datasets[1].name, "Jeddah");
    }
}
