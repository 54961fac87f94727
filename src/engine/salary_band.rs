//! Salary bands.
//!
//! Employees are bucketed by the base of their most recent approved
//! compensation assignment. Employees without one fall into the lowest band.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::SalaryAssignment;

/// Fixed salary bands, declared in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SalaryBand {
    /// Base up to and including 5,000.
    UpTo5k,
    /// Base from 5,001 to 10,000.
    From5kTo10k,
    /// Base from 10,001 to 15,000.
    From10kTo15k,
    /// Base above 15,000.
    Above15k,
}

impl SalaryBand {
    /// All bands in reporting order.
    pub const ALL: [SalaryBand; 4] = [
        SalaryBand::UpTo5k,
        SalaryBand::From5kTo10k,
        SalaryBand::From10kTo15k,
        SalaryBand::Above15k,
    ];

    /// Buckets a base amount.
    ///
    /// # Examples
    ///
    /// ```
    /// use workforce_compliance::engine::SalaryBand;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(SalaryBand::for_base(Decimal::from(5000)), SalaryBand::UpTo5k);
    /// assert_eq!(SalaryBand::for_base(Decimal::from(5001)), SalaryBand::From5kTo10k);
    /// assert_eq!(SalaryBand::for_base(Decimal::from(15001)), SalaryBand::Above15k);
    /// ```
    pub fn for_base(base: Decimal) -> Self {
        if base <= Decimal::from(5_000) {
            SalaryBand::UpTo5k
        } else if base <= Decimal::from(10_000) {
            SalaryBand::From5kTo10k
        } else if base <= Decimal::from(15_000) {
            SalaryBand::From10kTo15k
        } else {
            SalaryBand::Above15k
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            SalaryBand::UpTo5k => "Up to 5k",
            SalaryBand::From5kTo10k => "5k-10k",
            SalaryBand::From10kTo15k => "10k-15k",
            SalaryBand::Above15k => "15k+",
        }
    }

    /// Position in reporting order.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }
}

/// Latest approved base per employee.
#[derive(Debug, Clone, Default)]
pub struct SalaryIndex {
    latest: HashMap<String, (chrono::NaiveDate, String, Decimal)>,
}

impl SalaryIndex {
    /// Indexes the most recent approved assignment of each employee.
    ///
    /// Draft and cancelled assignments are ignored. Two approved assignments
    /// on the same date resolve to the one with the higher identifier.
    pub fn from_assignments(assignments: &[SalaryAssignment]) -> Self {
        let mut latest: HashMap<String, (chrono::NaiveDate, String, Decimal)> = HashMap::new();
        for a in assignments.iter().filter(|a| a.is_approved()) {
            let newer = latest
                .get(&a.employee)
                .is_none_or(|(date, id, _)| (a.effective_from, &a.id) > (*date, id));
            if newer {
                latest.insert(a.employee.clone(), (a.effective_from, a.id.clone(), a.base));
            }
        }
        Self { latest }
    }

    /// Base of the employee's latest approved assignment.
    pub fn base_for(&self, employee: &str) -> Option<Decimal> {
        self.latest.get(employee).map(|(_, _, base)| *base)
    }

    /// Band of the employee; no assignment counts as a base of zero.
    pub fn band_for(&self, employee: &str) -> SalaryBand {
        SalaryBand::for_base(self.base_for(employee).unwrap_or(Decimal::ZERO))
    }
}
