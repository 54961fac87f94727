//! Scope expansion.
//!
//! Turns a company / holding / nothing selection into the ordered set of
//! company identifiers a multi-company report iterates over.

use std::collections::BTreeSet;

use tracing::warn;

use crate::error::EngineResult;
use crate::models::{CompanyNode, EmployeeRecord, PolicyRecord};
use crate::store::WorkforceStore;

/// What the caller asked to report on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSelector {
    /// One explicit company.
    Company(String),
    /// Direct children of a holding company.
    Holding(String),
    /// Every known company.
    All,
}

impl ScopeSelector {
    /// Builds a selector from optional request parameters.
    ///
    /// Blank values count as absent. An explicit company wins over a holding.
    pub fn from_params(company: Option<&str>, holding: Option<&str>) -> Self {
        let present = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        match (present(company), present(holding)) {
            (Some(company), _) => ScopeSelector::Company(company),
            (None, Some(holding)) => ScopeSelector::Holding(holding),
            (None, None) => ScopeSelector::All,
        }
    }

    /// The explicit company, if one was selected.
    pub fn company(&self) -> Option<&str> {
        match self {
            ScopeSelector::Company(company) => Some(company),
            _ => None,
        }
    }
}

/// Expands a selector against the company hierarchy.
///
/// Holdings expand one level only. An empty result is not an error.
///
/// # Example
///
/// ```
/// use workforce_compliance::engine::{expand, ScopeSelector};
/// use workforce_compliance::models::CompanyNode;
///
/// let companies = vec![
///     CompanyNode { id: "Holding".to_string(), parent: None },
///     CompanyNode { id: "Sub B".to_string(), parent: Some("Holding".to_string()) },
///     CompanyNode { id: "Sub A".to_string(), parent: Some("Holding".to_string()) },
/// ];
///
/// let subs: Vec<String> = expand(&companies, &ScopeSelector::Holding("Holding".to_string()))
///     .into_iter()
///     .collect();
/// assert_eq!(subs, vec!["Sub A", "Sub B"]);
/// ```
pub fn expand(companies: &[CompanyNode], selector: &ScopeSelector) -> BTreeSet<String> {
    match selector {
        ScopeSelector::Company(company) => BTreeSet::from([company.clone()]),
        ScopeSelector::Holding(holding) => companies
            .iter()
            .filter(|c| c.is_child_of(holding))
            .map(|c| c.id.clone())
            .collect(),
        ScopeSelector::All => companies.iter().map(|c| c.id.clone()).collect(),
    }
}

/// Expands a selector using the store's company list.
pub fn expand_scope(
    store: &dyn WorkforceStore,
    selector: &ScopeSelector,
) -> EngineResult<BTreeSet<String>> {
    match selector {
        ScopeSelector::Company(company) => Ok(BTreeSet::from([company.clone()])),
        _ => Ok(expand(&store.companies()?, selector)),
    }
}

/// Records of one company needed by snapshot and trend reports.
#[derive(Debug, Clone, Default)]
pub struct CompanyData {
    /// Company identifier.
    pub company: String,
    /// The company's employees.
    pub employees: Vec<EmployeeRecord>,
    /// The company's policy versions.
    pub policies: Vec<PolicyRecord>,
}

impl CompanyData {
    /// Reads one company from the store.
    pub fn load(store: &dyn WorkforceStore, company: &str) -> EngineResult<Self> {
        Ok(Self {
            company: company.to_string(),
            employees: store.employees(company)?,
            policies: store.policies(company)?,
        })
    }
}

/// Reads every company of the scope, in scope order.
///
/// A company whose records cannot be read is logged and left out, so one
/// failing subsidiary does not blank a holding-wide report.
pub fn load_scope(store: &dyn WorkforceStore, companies: &BTreeSet<String>) -> Vec<CompanyData> {
    companies
        .iter()
        .filter_map(|company| match CompanyData::load(store, company) {
            Ok(data) => Some(data),
            Err(err) => {
                warn!(company = %company, error = %err, "Excluding company from scope");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::SalaryAssignment;

    fn node(id: &str, parent: Option<&str>) -> CompanyNode {
        CompanyNode {
            id: id.to_string(),
            parent: parent.map(str::to_string),
        }
    }

    fn hierarchy() -> Vec<CompanyNode> {
        vec![
            node("Holding", None),
            node("Sub B", Some("Holding")),
            node("Sub A", Some("Holding")),
            node("Grandchild", Some("Sub A")),
            node("Standalone", None),
        ]
    }

    #[test]
    fn test_company_wins_over_holding() {
        let selector = ScopeSelector::from_params(Some("Sub A"), Some("Holding"));
        assert_eq!(selector, ScopeSelector::Company("Sub A".to_string()));
        let scope = expand(&hierarchy(), &selector);
        assert_eq!(scope.into_iter().collect::<Vec<_>>(), vec!["Sub A"]);
    }

    #[test]
    fn test_holding_expands_one_level() {
        let scope = expand(&hierarchy(), &ScopeSelector::Holding("Holding".to_string()));
        assert_eq!(scope.into_iter().collect::<Vec<_>>(), vec!["Sub A", "Sub B"]);
    }

    #[test]
    fn test_unknown_holding_is_empty() {
        let scope = expand(&hierarchy(), &ScopeSelector::Holding("Nobody".to_string()));
        assert!(scope.is_empty());
    }

    #[test]
    fn test_blank_params_select_all() {
        let selector = ScopeSelector::from_params(Some("  "), None);
        assert_eq!(selector, ScopeSelector::All);
        assert_eq!(expand(&hierarchy(), &selector).len(), 5);
    }

    struct FlakyStore;

    impl WorkforceStore for FlakyStore {
        fn companies(&self) -> EngineResult<Vec<CompanyNode>> {
            Ok(hierarchy())
        }

        fn employees(&self, company: &str) -> EngineResult<Vec<EmployeeRecord>> {
            if company == "Sub B" {
                return Err(EngineError::StoreError {
                    company: company.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(Vec::new())
        }

        fn policies(&self, _company: &str) -> EngineResult<Vec<PolicyRecord>> {
            Ok(Vec::new())
        }

        fn salary_assignments(&self, _company: &str) -> EngineResult<Vec<SalaryAssignment>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_failing_company_is_excluded() {
        let scope = expand_scope(&FlakyStore, &ScopeSelector::Holding("Holding".to_string())).unwrap();
        let loaded = load_scope(&FlakyStore, &scope);
        let names: Vec<&str> = loaded.iter().map(|d| d.company.as_str()).collect();
        assert_eq!(names, vec!["Sub A"]);
    }
}
