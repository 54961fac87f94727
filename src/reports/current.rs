//! Current-state views.
//!
//! These views count employees whose status is `Active`, whatever their
//! hire and termination dates say. `as_of` only selects the policy version
//! and the reference date for tenure.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::EngineSettings;
use crate::engine::{
    CompanyData, Dimension, DimensionFilter, Grouping, RollupQuery, SalaryIndex, Snapshot, aggregate,
    attach_targets, classify, month_label, month_start, rank_by_headcount, rank_worst_first,
    round_percent,
};
use crate::error::EngineResult;
use crate::models::{AggregateRow, ChartDataset, ChartPayload, ComplianceStatus, EmployeeRecord};
use crate::store::WorkforceStore;

use super::{CompanyFilter, ensure_company, overrides_for};

const COMPOSITION_SERIES: &str = "Composition %";

/// Headline figures of a company, optionally filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Employees counted.
    pub total_employees: u32,
    /// National employees.
    pub national_count: u32,
    /// Non-national employees.
    pub non_national_count: u32,
    /// Share of national employees, 1 dp.
    pub composition_percent: Decimal,
    /// Mean latest approved base of national employees, 0 dp.
    pub avg_salary_national: Option<Decimal>,
    /// Mean latest approved base of non-national employees, 0 dp.
    pub avg_salary_non_national: Option<Decimal>,
    /// Mean tenure of national employees in years, 1 dp.
    pub avg_tenure_years_national: Option<Decimal>,
    /// Mean tenure of non-national employees in years, 1 dp.
    pub avg_tenure_years_non_national: Option<Decimal>,
    /// Target of the policy in force for the filtered dimension.
    pub target_percent: Option<Decimal>,
    /// `composition_percent - target_percent`.
    pub variance_percent: Option<Decimal>,
    /// Status under the compliance classification mode.
    pub status: Option<ComplianceStatus>,
}

/// Overall actual against target as a two-series chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualVsTarget {
    /// `{labels: ["Composition %"], datasets: [Actual, Target]}`.
    #[serde(flatten)]
    pub chart: ChartPayload,
    /// `actual - target`, `None` when no policy is in force.
    pub variance_percent: Option<Decimal>,
}

fn current_records<'a>(
    records: &'a [EmployeeRecord],
    filter: &'a CompanyFilter,
) -> impl Iterator<Item = &'a EmployeeRecord> + 'a {
    let record_filter = filter.record_filter();
    records
        .iter()
        .filter(move |r| r.is_current() && record_filter.matches(r))
}

/// Whole months from `from` to `to`, never negative.
fn full_months(from: NaiveDate, to: NaiveDate) -> u32 {
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0).unsigned_abs()
}

fn mean<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    let (sum, count) = values
        .into_iter()
        .fold((Decimal::ZERO, 0u32), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / Decimal::from(count))
}

fn avg_salary<'a>(
    records: impl Iterator<Item = &'a EmployeeRecord>,
    salaries: &SalaryIndex,
) -> Option<Decimal> {
    mean(records.filter_map(|r| salaries.base_for(&r.id)))
        .map(|avg| avg.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

fn avg_tenure_years<'a>(
    records: impl Iterator<Item = &'a EmployeeRecord>,
    as_of: NaiveDate,
) -> Option<Decimal> {
    mean(
        records
            .filter_map(|r| r.hire_date)
            .map(|hired| Decimal::from(full_months(hired, as_of))),
    )
    .map(|months| round_percent(months / Decimal::from(12)))
}

/// Headline KPIs of the current workforce.
///
/// The target comes from the policy in force on `as_of`, resolved for the
/// department and designation filters when given.
pub fn kpis(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    filter: &CompanyFilter,
    as_of: NaiveDate,
) -> EngineResult<KpiSummary> {
    ensure_company(store, &filter.company)?;
    let data = CompanyData::load(store, &filter.company)?;
    let salaries = SalaryIndex::from_assignments(&store.salary_assignments(&filter.company)?);

    let records: Vec<&EmployeeRecord> = current_records(&data.employees, filter).collect();
    let nationals = || records.iter().copied().filter(|r| r.is_national);
    let others = || records.iter().copied().filter(|r| !r.is_national);

    let snap = Snapshot::tally(records.iter().copied());
    let target = overrides_for(&data, as_of).map(|o| o.target_for(filter.dimension()));
    let result = classify(
        snap.composition_percent,
        target,
        settings.classification.compliance,
    );

    Ok(KpiSummary {
        total_employees: snap.total,
        national_count: snap.national_count,
        non_national_count: snap.non_national_count,
        composition_percent: snap.composition_percent,
        avg_salary_national: avg_salary(nationals(), &salaries),
        avg_salary_non_national: avg_salary(others(), &salaries),
        avg_tenure_years_national: avg_tenure_years(nationals(), as_of),
        avg_tenure_years_non_national: avg_tenure_years(others(), as_of),
        target_percent: target,
        variance_percent: result.variance,
        status: result.status,
    })
}

fn current_rollup(
    store: &dyn WorkforceStore,
    filter: &CompanyFilter,
    grouping: Grouping,
    min_headcount: u32,
) -> EngineResult<(CompanyData, Vec<AggregateRow>)> {
    ensure_company(store, &filter.company)?;
    let data = CompanyData::load(store, &filter.company)?;
    let salaries = match grouping {
        Grouping::By(Dimension::SalaryBand) => {
            SalaryIndex::from_assignments(&store.salary_assignments(&filter.company)?)
        }
        _ => SalaryIndex::default(),
    };
    let query = RollupQuery::new(grouping)
        .with_filter(filter.record_filter())
        .min_headcount(min_headcount);
    let rows = aggregate(&data.employees, &salaries, &query);
    Ok((data, rows))
}

/// Current headcount per nationality group, largest first.
pub fn nationality_groups(
    store: &dyn WorkforceStore,
    filter: &CompanyFilter,
) -> EngineResult<Vec<AggregateRow>> {
    let filter = CompanyFilter {
        nationality_group: None,
        ..filter.clone()
    };
    let (_, mut rows) = current_rollup(store, &filter, Grouping::By(Dimension::NationalityGroup), 0)?;
    rank_by_headcount(&mut rows);
    Ok(rows)
}

/// Composition by designation, worst first, capped.
pub fn designation_chart(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    filter: &CompanyFilter,
    min_headcount: u32,
) -> EngineResult<ChartPayload> {
    let filter = CompanyFilter {
        designation: None,
        nationality_group: None,
        ..filter.clone()
    };
    let (_, mut rows) = current_rollup(store, &filter, Grouping::By(Dimension::Designation), min_headcount)?;
    rank_worst_first(&mut rows);
    rows.truncate(settings.limits.designation_chart);
    Ok(ChartPayload::from_rows(&rows, COMPOSITION_SERIES, |r| {
        Some(r.composition_percent)
    }))
}

/// National and non-national headcount by department, worst first, capped.
pub fn department_chart(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    filter: &CompanyFilter,
) -> EngineResult<ChartPayload> {
    let filter = CompanyFilter {
        department: None,
        nationality_group: None,
        ..filter.clone()
    };
    let (_, mut rows) = current_rollup(store, &filter, Grouping::By(Dimension::Department), 0)?;
    rank_worst_first(&mut rows);
    rows.truncate(settings.limits.department_chart);
    Ok(
        ChartPayload::from_rows(&rows, "National", |r| Some(Decimal::from(r.national_count)))
            .with_series(&rows, "Non-National", |r| {
                Some(Decimal::from(r.non_national_count))
            }),
    )
}

/// Composition per salary band, in band order.
pub fn salary_band_chart(
    store: &dyn WorkforceStore,
    filter: &CompanyFilter,
) -> EngineResult<ChartPayload> {
    let filter = CompanyFilter {
        nationality_group: None,
        ..filter.clone()
    };
    let (_, rows) = current_rollup(store, &filter, Grouping::By(Dimension::SalaryBand), 0)?;
    Ok(ChartPayload::from_rows(&rows, COMPOSITION_SERIES, |r| {
        Some(r.composition_percent)
    }))
}

/// Composition of hires per hire month over the last `months_back` months.
///
/// Only current employees are counted; months without hires are absent.
pub fn hiring_trend(
    store: &dyn WorkforceStore,
    filter: &CompanyFilter,
    as_of: NaiveDate,
    months_back: u32,
) -> EngineResult<ChartPayload> {
    ensure_company(store, &filter.company)?;
    let records = store.employees(&filter.company)?;
    let filter = CompanyFilter {
        nationality_group: None,
        ..filter.clone()
    };
    let cutoff = as_of
        .checked_sub_months(Months::new(months_back))
        .unwrap_or(NaiveDate::MIN);

    let mut by_month: BTreeMap<NaiveDate, Vec<&EmployeeRecord>> = BTreeMap::new();
    for record in current_records(&records, &filter) {
        if let Some(hired) = record.hire_date.filter(|d| *d >= cutoff && *d <= as_of) {
            by_month.entry(month_start(hired)).or_default().push(record);
        }
    }

    let mut chart = ChartPayload::default();
    let mut composition = Vec::new();
    let mut hires = Vec::new();
    for (month, members) in by_month {
        let snap = Snapshot::tally(members);
        chart.labels.push(month_label(month));
        composition.push(Some(snap.composition_percent));
        hires.push(Some(Decimal::from(snap.total)));
    }
    chart.datasets = vec![
        ChartDataset {
            name: COMPOSITION_SERIES.to_string(),
            values: composition,
        },
        ChartDataset {
            name: "Hires".to_string(),
            values: hires,
        },
    ];
    Ok(chart)
}

/// Overall actual composition against the target in force.
pub fn actual_vs_target(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    filter: &CompanyFilter,
    as_of: NaiveDate,
) -> EngineResult<ActualVsTarget> {
    let summary = kpis(store, settings, filter, as_of)?;
    Ok(ActualVsTarget {
        chart: ChartPayload {
            labels: vec![COMPOSITION_SERIES.to_string()],
            datasets: vec![
                ChartDataset {
                    name: "Actual".to_string(),
                    values: vec![Some(summary.composition_percent)],
                },
                ChartDataset {
                    name: "Target".to_string(),
                    values: vec![summary.target_percent],
                },
            ],
        },
        variance_percent: summary.variance_percent,
    })
}

/// Departments against their targets, worst first.
///
/// Department overrides replace the default target; a department override's
/// minimum headcount raises the requested minimum for that department.
pub fn department_compliance(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    company: &str,
    as_of: NaiveDate,
    min_headcount: u32,
) -> EngineResult<Vec<AggregateRow>> {
    let grouping = Grouping::By(Dimension::Department);
    let (data, rows) = current_rollup(store, &CompanyFilter::company(company), grouping, min_headcount)?;
    let mut rows = attach_targets(
        rows,
        grouping,
        overrides_for(&data, as_of).as_ref(),
        DimensionFilter::none(),
        settings.classification.compliance,
    );
    rank_worst_first(&mut rows);
    Ok(rows)
}

/// Department × designation composition with layered targets.
///
/// Ordered by department, then ascending composition.
pub fn matrix(
    store: &dyn WorkforceStore,
    settings: &EngineSettings,
    company: &str,
    as_of: NaiveDate,
    min_headcount: u32,
) -> EngineResult<Vec<AggregateRow>> {
    let grouping = Grouping::DepartmentDesignation;
    let (data, rows) = current_rollup(store, &CompanyFilter::company(company), grouping, min_headcount)?;
    let mut rows = attach_targets(
        rows,
        grouping,
        overrides_for(&data, as_of).as_ref(),
        DimensionFilter::none(),
        settings.classification.compliance,
    );
    rows.sort_by(|a, b| {
        a.label
            .cmp(&b.label)
            .then_with(|| a.composition_percent.cmp(&b.composition_percent))
            .then_with(|| a.sub_label.cmp(&b.sub_label))
    });
    Ok(rows)
}
