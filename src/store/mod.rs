//! Read-only access to the external record store.
//!
//! The engine never owns employee or policy data. It reads it through the
//! [`WorkforceStore`] trait, one call per company, and assumes each call sees
//! a consistent point-in-time view. [`InMemoryStore`] is the bundled
//! implementation, filled from YAML files by [`DatasetLoader`].

mod loader;
mod memory;

pub use loader::DatasetLoader;
pub use memory::InMemoryStore;

use crate::error::EngineResult;
use crate::models::{CompanyNode, EmployeeRecord, PolicyRecord, SalaryAssignment};

/// Queryable view of the records the engine consumes.
///
/// Implementations must be safe to share between request handlers. A failed
/// read for one company is reported as an error for that company only;
/// multi-company operations exclude it and carry on.
pub trait WorkforceStore: Send + Sync {
    /// All known companies.
    fn companies(&self) -> EngineResult<Vec<CompanyNode>>;

    /// All employee records of a company, whatever their status.
    fn employees(&self, company: &str) -> EngineResult<Vec<EmployeeRecord>>;

    /// All policy versions of a company, with their lines.
    fn policies(&self, company: &str) -> EngineResult<Vec<PolicyRecord>>;

    /// All salary assignments of a company's employees.
    fn salary_assignments(&self, company: &str) -> EngineResult<Vec<SalaryAssignment>>;
}
