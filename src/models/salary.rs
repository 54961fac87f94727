//! Compensation assignment model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Approval state of a compensation assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    /// Saved but not approved.
    #[default]
    Draft,
    /// Approved and in force from its effective date.
    Approved,
    /// Withdrawn.
    Cancelled,
}

/// A salary structure assignment for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryAssignment {
    /// Identifier of the assignment.
    pub id: String,
    /// Employee the assignment belongs to.
    pub employee: String,
    /// Company of the employee.
    pub company: String,
    /// Date the assignment takes effect.
    pub effective_from: NaiveDate,
    /// Monthly base amount.
    pub base: Decimal,
    /// Approval state.
    #[serde(default)]
    pub state: AssignmentState,
}

impl SalaryAssignment {
    /// Returns true if the assignment is approved.
    pub fn is_approved(&self) -> bool {
        self.state == AssignmentState::Approved
    }
}
