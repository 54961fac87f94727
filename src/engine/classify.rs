//! Compliance classification.
//!
//! Maps an actual composition and a target onto a variance and a status.
//! Two vocabularies are in use and they do not agree on where the
//! boundaries sit, so the caller picks one per report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ComplianceStatus;

use super::percent::round_percent;

/// Points below target still reported as Amber under Threshold-2.
pub const AMBER_BAND: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Points below target still reported as Near under Threshold-10.
pub const NEAR_BAND: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Which status vocabulary a report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Green / Amber / Red with a two-point amber band.
    ThresholdTwo,
    /// Compliant / Near / Below with a ten-point near band.
    ThresholdTen,
}

/// Variance and status for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// `actual - target`, rounded to 1 dp; `None` when the target is unknown.
    pub variance: Option<Decimal>,
    /// Status under the chosen mode; `None` when the target is unknown.
    pub status: Option<ComplianceStatus>,
}

/// Classifies an actual percentage against an optional target.
///
/// # Examples
///
/// ```
/// use workforce_compliance::engine::{classify, ClassificationMode};
/// use workforce_compliance::models::ComplianceStatus;
/// use rust_decimal::Decimal;
///
/// let result = classify(Decimal::new(400, 1), Some(Decimal::from(50)), ClassificationMode::ThresholdTwo);
/// assert_eq!(result.variance, Some(Decimal::new(-100, 1)));
/// assert_eq!(result.status, Some(ComplianceStatus::Red));
///
/// let unknown = classify(Decimal::new(400, 1), None, ClassificationMode::ThresholdTwo);
/// assert_eq!(unknown.variance, None);
/// assert_eq!(unknown.status, None);
/// ```
pub fn classify(
    actual: Decimal,
    target: Option<Decimal>,
    mode: ClassificationMode,
) -> Classification {
    let Some(target) = target else {
        return Classification {
            variance: None,
            status: None,
        };
    };

    // Status is decided on the exact difference; only the reported value is rounded.
    let raw = actual - target;
    let status = match mode {
        ClassificationMode::ThresholdTwo => {
            if raw >= Decimal::ZERO {
                ComplianceStatus::Green
            } else if raw >= -AMBER_BAND {
                ComplianceStatus::Amber
            } else {
                ComplianceStatus::Red
            }
        }
        ClassificationMode::ThresholdTen => {
            if actual >= target {
                ComplianceStatus::Compliant
            } else if actual >= target - NEAR_BAND {
                ComplianceStatus::Near
            } else {
                ComplianceStatus::Below
            }
        }
    };

    Classification {
        variance: Some(round_percent(raw)),
        status: Some(status),
    }
}
