//! Compliance engine.
//!
//! The leaves of the engine, in dependency order:
//!
//! - [`snapshot`]: who was employed on a date
//! - [`policy`]: which target applies to a company, date and dimension
//! - [`classify`]: variance and status of an actual against a target
//! - [`rollup`]: grouped headcount and composition with worst-first ranking
//! - [`trend`]: month-end series over a company set
//! - [`scope`]: company / holding / all expansion
//!
//! Every function here is a synchronous, pure read over records already
//! fetched from a [`WorkforceStore`](crate::store::WorkforceStore).

pub mod classify;
pub mod percent;
pub mod policy;
pub mod rollup;
pub mod salary_band;
pub mod scope;
pub mod snapshot;
pub mod trend;

pub use classify::{AMBER_BAND, Classification, ClassificationMode, NEAR_BAND, classify};
pub use percent::{ONE_HUNDRED, round_percent, share_percent, weighted_average};
pub use policy::{DimensionFilter, TargetOverrides, active_policy, resolve_overrides, target_for};
pub use rollup::{
    Dimension, Grouping, Population, RecordFilter, RollupQuery, UNASSIGNED_LABEL, Unassigned,
    aggregate, attach_targets, rank_by_headcount, rank_worst_first, worst_first,
};
pub use salary_band::{SalaryBand, SalaryIndex};
pub use scope::{CompanyData, ScopeSelector, expand, expand_scope, load_scope};
pub use snapshot::{Scope, Snapshot, snapshot, snapshot_from_store};
pub use trend::{
    ScopePoint, TrendSeries, branch_series, month_end, month_grid, month_label, month_over_month,
    month_start, previous_month_end, scope_point, top_branches, trend,
};
