//! Company hierarchy model.

use serde::{Deserialize, Serialize};

/// A company in the two-level holding hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyNode {
    /// Company identifier.
    pub id: String,
    /// Holding company this company reports to, if any.
    #[serde(default)]
    pub parent: Option<String>,
}

impl CompanyNode {
    /// Returns true if this company is a direct subsidiary of `holding`.
    pub fn is_child_of(&self, holding: &str) -> bool {
        self.parent.as_deref() == Some(holding)
    }
}
