//! In-memory record store.

use std::collections::BTreeMap;

use crate::error::EngineResult;
use crate::models::{CompanyNode, EmployeeRecord, PolicyRecord, SalaryAssignment};

use super::WorkforceStore;

/// A [`WorkforceStore`] holding every record in memory, indexed by company.
///
/// # Example
///
/// ```
/// use workforce_compliance::models::CompanyNode;
/// use workforce_compliance::store::{InMemoryStore, WorkforceStore};
///
/// let store = InMemoryStore::new(
///     vec![CompanyNode { id: "Acme KSA".to_string(), parent: None }],
///     vec![],
///     vec![],
///     vec![],
/// );
/// assert_eq!(store.companies().unwrap().len(), 1);
/// assert!(store.employees("Acme KSA").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    companies: Vec<CompanyNode>,
    employees: BTreeMap<String, Vec<EmployeeRecord>>,
    policies: BTreeMap<String, Vec<PolicyRecord>>,
    salaries: BTreeMap<String, Vec<SalaryAssignment>>,
}

impl InMemoryStore {
    /// Builds a store from flat record lists.
    pub fn new(
        companies: Vec<CompanyNode>,
        employees: Vec<EmployeeRecord>,
        policies: Vec<PolicyRecord>,
        salaries: Vec<SalaryAssignment>,
    ) -> Self {
        let mut store = Self {
            companies,
            ..Self::default()
        };
        for employee in employees {
            store
                .employees
                .entry(employee.company.clone())
                .or_default()
                .push(employee);
        }
        for policy in policies {
            store
                .policies
                .entry(policy.company.clone())
                .or_default()
                .push(policy);
        }
        for assignment in salaries {
            store
                .salaries
                .entry(assignment.company.clone())
                .or_default()
                .push(assignment);
        }
        store
    }

    /// Total number of employee records across all companies.
    pub fn employee_count(&self) -> usize {
        self.employees.values().map(Vec::len).sum()
    }
}

impl WorkforceStore for InMemoryStore {
    fn companies(&self) -> EngineResult<Vec<CompanyNode>> {
        Ok(self.companies.clone())
    }

    fn employees(&self, company: &str) -> EngineResult<Vec<EmployeeRecord>> {
        Ok(self.employees.get(company).cloned().unwrap_or_default())
    }

    fn policies(&self, company: &str) -> EngineResult<Vec<PolicyRecord>> {
        Ok(self.policies.get(company).cloned().unwrap_or_default())
    }

    fn salary_assignments(&self, company: &str) -> EngineResult<Vec<SalaryAssignment>> {
        Ok(self.salaries.get(company).cloned().unwrap_or_default())
    }
}
