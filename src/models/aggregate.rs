//! Output models produced by the engine.
//!
//! These types are constructed per call and never persisted. They are
//! JSON-serializable so the HTTP layer can return them unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Qualitative compliance status.
///
/// The first three variants belong to the Threshold-2 vocabulary, the last
/// three to the Threshold-10 vocabulary. A single row only ever carries a
/// status from the vocabulary its report was configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    /// At or above target.
    Green,
    /// Below target by at most two points.
    Amber,
    /// More than two points below target.
    Red,
    /// At or above target.
    Compliant,
    /// Below target by at most ten points.
    Near,
    /// More than ten points below target.
    Below,
}

/// One grouped row of a rollup.
///
/// `label` holds the primary dimension value, `sub_label` the second value
/// of a composite grouping (department × designation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Primary dimension value.
    pub label: String,
    /// Secondary dimension value for composite groupings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_label: Option<String>,
    /// Number of employees in the group.
    pub headcount: u32,
    /// Employees flagged as national workforce.
    pub national_count: u32,
    /// Employees not flagged as national workforce.
    pub non_national_count: u32,
    /// Share of national workforce, 1 dp.
    pub composition_percent: Decimal,
    /// Resolved target, `None` when unknown.
    pub target_percent: Option<Decimal>,
    /// `composition_percent - target_percent`, `None` when target unknown.
    pub variance_percent: Option<Decimal>,
    /// Status under the report's classification mode.
    pub status: Option<ComplianceStatus>,
}

/// A named series of a chart payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDataset {
    /// Series name shown in the legend.
    pub name: String,
    /// One value per label; `None` where the value is unknown.
    pub values: Vec<Option<Decimal>>,
}

/// A labeled chart payload: `{labels: [...], datasets: [{name, values}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartPayload {
    /// Category or month labels.
    pub labels: Vec<String>,
    /// Series aligned with `labels`.
    pub datasets: Vec<ChartDataset>,
}

impl ChartPayload {
    /// Builds a single-series chart from rollup rows.
    ///
    /// # Example
    ///
    /// ```
    /// use workforce_compliance::models::{AggregateRow, ChartPayload};
    /// use rust_decimal::Decimal;
    ///
    /// let rows = vec![AggregateRow {
    ///     label: "Finance".to_string(),
    ///     sub_label: None,
    ///     headcount: 10,
    ///     national_count: 4,
    ///     non_national_count: 6,
    ///     composition_percent: Decimal::new(400, 1),
    ///     target_percent: None,
    ///     variance_percent: None,
    ///     status: None,
    /// }];
    ///
    /// let chart = ChartPayload::from_rows(&rows, "Composition %", |r| Some(r.composition_percent));
    /// assert_eq!(chart.labels, vec!["Finance"]);
    /// assert_eq!(chart.datasets[0].values, vec![Some(Decimal::new(400, 1))]);
    /// ```
    pub fn from_rows<F>(rows: &[AggregateRow], series_name: &str, value: F) -> Self
    where
        F: Fn(&AggregateRow) -> Option<Decimal>,
    {
        Self {
            labels: rows.iter().map(|r| r.label.clone()).collect(),
            datasets: vec![ChartDataset {
                name: series_name.to_string(),
                values: rows.iter().map(value).collect(),
            }],
        }
    }

    /// Appends a series built from rollup rows; labels must already match.
    pub fn with_series<F>(mut self, rows: &[AggregateRow], series_name: &str, value: F) -> Self
    where
        F: Fn(&AggregateRow) -> Option<Decimal>,
    {
        self.datasets.push(ChartDataset {
            name: series_name.to_string(),
            values: rows.iter().map(value).collect(),
        });
        self
    }
}
