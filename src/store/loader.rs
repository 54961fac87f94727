//! Dataset loading functionality.
//!
//! Reads a directory of YAML record files into an [`InMemoryStore`].

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::config::load_yaml;
use crate::error::EngineResult;
use crate::models::{CompanyNode, EmployeeRecord, PolicyRecord, SalaryAssignment};

use super::InMemoryStore;

#[derive(Debug, Deserialize)]
struct CompaniesFile {
    companies: Vec<CompanyNode>,
}

#[derive(Debug, Deserialize)]
struct EmployeesFile {
    employees: Vec<EmployeeRecord>,
}

#[derive(Debug, Deserialize)]
struct PoliciesFile {
    policies: Vec<PolicyRecord>,
}

#[derive(Debug, Deserialize)]
struct SalaryAssignmentsFile {
    assignments: Vec<SalaryAssignment>,
}

/// Loads record files into an in-memory store.
///
/// # Directory Structure
///
/// ```text
/// data/demo/
/// ├── companies.yaml            # Company hierarchy
/// ├── employees.yaml            # Employee records
/// ├── policies.yaml             # Policy versions with their lines
/// └── salary_assignments.yaml   # Optional compensation assignments
/// ```
///
/// # Example
///
/// ```no_run
/// use workforce_compliance::store::DatasetLoader;
///
/// let store = DatasetLoader::load("./data/demo")?;
/// println!("Loaded {} employees", store.employee_count());
/// # Ok::<(), workforce_compliance::error::EngineError>(())
/// ```
pub struct DatasetLoader;

impl DatasetLoader {
    /// Loads every record file from `path`.
    ///
    /// `companies.yaml`, `employees.yaml` and `policies.yaml` are required;
    /// a missing `salary_assignments.yaml` means no assignments.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<InMemoryStore> {
        let path = path.as_ref();

        let companies = load_yaml::<CompaniesFile>(&path.join("companies.yaml"))?.companies;
        let employees = load_yaml::<EmployeesFile>(&path.join("employees.yaml"))?.employees;
        let policies = load_yaml::<PoliciesFile>(&path.join("policies.yaml"))?.policies;

        let salary_path = path.join("salary_assignments.yaml");
        let assignments = if salary_path.exists() {
            load_yaml::<SalaryAssignmentsFile>(&salary_path)?.assignments
        } else {
            Vec::new()
        };

        info!(
            dataset = %path.display(),
            companies = companies.len(),
            employees = employees.len(),
            policies = policies.len(),
            salary_assignments = assignments.len(),
            "Dataset loaded"
        );

        Ok(InMemoryStore::new(companies, employees, policies, assignments))
    }
}
