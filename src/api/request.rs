//! Query parameter types for the workforce compliance API.
//!
//! Every endpoint is a `GET` with query parameters. Blank values count as
//! absent; defaults come from [`EngineSettings`].

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::EngineSettings;
use crate::engine::{RecordFilter, ScopeSelector};
use crate::error::{EngineError, EngineResult, require_scope};
use crate::reports::{CompanyFilter, EmployeeListQuery};

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parses a typed query value, treating an empty or blank value as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Validates `months_back` against the configured maximum.
///
/// Zero falls back to the endpoint default.
pub(crate) fn months_back(value: Option<u32>, default: u32, settings: &EngineSettings) -> EngineResult<u32> {
    let months = value.filter(|m| *m > 0).unwrap_or(default);
    let max = settings.limits.max_months_back;
    if months > max {
        return Err(EngineError::InvalidParameter {
            name: "months_back".to_string(),
            message: format!("must not exceed {}", max),
        });
    }
    Ok(months.max(1))
}

/// Parameters of the current-state views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    /// Company (required).
    pub company: Option<String>,
    /// Department filter.
    pub department: Option<String>,
    /// Designation filter.
    pub designation: Option<String>,
    /// Nationality group filter.
    pub nationality_group: Option<String>,
    /// Policy and tenure reference date; today when absent.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub as_of_date: Option<NaiveDate>,
    /// Minimum group headcount.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_headcount: Option<u32>,
    /// Months of hiring history.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub months_back: Option<u32>,
}

impl FilterQuery {
    /// The validated company filter.
    pub fn filter(&self) -> EngineResult<CompanyFilter> {
        Ok(CompanyFilter {
            company: require_scope("company", self.company.as_deref())?,
            department: present(&self.department),
            designation: present(&self.designation),
            nationality_group: present(&self.nationality_group),
        })
    }

    /// The reference date, defaulting to `today`.
    pub fn as_of(&self, today: NaiveDate) -> NaiveDate {
        self.as_of_date.unwrap_or(today)
    }

    /// The minimum headcount, defaulting from settings.
    pub fn min_headcount(&self, settings: &EngineSettings) -> u32 {
        self.min_headcount.unwrap_or(settings.defaults.min_headcount)
    }
}

/// Parameters of the multi-company executive views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeQuery {
    /// Explicit company; wins over `holding_company`.
    pub company: Option<String>,
    /// Holding whose direct subsidiaries are reported.
    pub holding_company: Option<String>,
    /// Branch filter.
    pub branch: Option<String>,
    /// Reference date; today when absent.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub as_of_date: Option<NaiveDate>,
    /// Months of trend history.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub months_back: Option<u32>,
}

impl ScopeQuery {
    /// The scope selector; absent company and holding select every company.
    pub fn selector(&self) -> ScopeSelector {
        ScopeSelector::from_params(self.company.as_deref(), self.holding_company.as_deref())
    }

    /// The required holding company.
    pub fn holding(&self) -> EngineResult<String> {
        require_scope("holding_company", self.holding_company.as_deref())
    }

    /// The branch filter.
    pub fn branch(&self) -> Option<String> {
        present(&self.branch)
    }

    /// The reference date, defaulting to `today`.
    pub fn as_of(&self, today: NaiveDate) -> NaiveDate {
        self.as_of_date.unwrap_or(today)
    }
}

/// Parameters of the single-company drill-downs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrilldownQuery {
    /// Company (required).
    pub company: Option<String>,
    /// Department, required by the designation breakdown.
    pub department: Option<String>,
    /// Branch filter.
    pub branch: Option<String>,
    /// Reference date; today when absent.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub as_of_date: Option<NaiveDate>,
    /// Minimum group headcount.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_headcount: Option<u32>,
    /// Number of risky positions returned.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub top_n: Option<usize>,
}

impl DrilldownQuery {
    /// The required company.
    pub fn company(&self) -> EngineResult<String> {
        require_scope("company", self.company.as_deref())
    }

    /// The required department.
    pub fn department(&self) -> EngineResult<String> {
        require_scope("department", self.department.as_deref())
    }

    /// The branch filter.
    pub fn branch(&self) -> Option<String> {
        present(&self.branch)
    }

    /// The reference date, defaulting to `today`.
    pub fn as_of(&self, today: NaiveDate) -> NaiveDate {
        self.as_of_date.unwrap_or(today)
    }

    /// The minimum headcount, defaulting from settings.
    pub fn min_headcount(&self, settings: &EngineSettings) -> u32 {
        self.min_headcount.unwrap_or(settings.defaults.min_headcount)
    }

    /// The number of risky positions, defaulting from settings.
    pub fn top_n(&self, settings: &EngineSettings) -> usize {
        self.top_n.unwrap_or(settings.defaults.top_risky)
    }
}

/// Parameters of the employee list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeQuery {
    /// Company (required).
    pub company: Option<String>,
    /// Reference date; today when absent.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub as_of_date: Option<NaiveDate>,
    /// Branch filter.
    pub branch: Option<String>,
    /// Department filter.
    pub department: Option<String>,
    /// Designation filter.
    pub designation: Option<String>,
    /// Nationality group filter.
    pub nationality_group: Option<String>,
    /// National flag filter: `1`/`true` or `0`/`false`.
    pub is_national: Option<String>,
    /// Search text.
    pub search: Option<String>,
    /// Page size.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<usize>,
    /// Rows to skip.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub offset: Option<usize>,
}

impl EmployeeQuery {
    fn national_flag(&self) -> EngineResult<Option<bool>> {
        match present(&self.is_national).as_deref() {
            None => Ok(None),
            Some("1") | Some("true") => Ok(Some(true)),
            Some("0") | Some("false") => Ok(Some(false)),
            Some(other) => Err(EngineError::InvalidParameter {
                name: "is_national".to_string(),
                message: format!("expected 0, 1, true or false, got '{}'", other),
            }),
        }
    }

    /// Validates the parameters and applies defaults.
    pub fn into_list_query(
        self,
        settings: &EngineSettings,
        today: NaiveDate,
    ) -> EngineResult<EmployeeListQuery> {
        let limit = self.limit.unwrap_or(settings.defaults.page_size);
        if limit == 0 || limit > settings.limits.max_page_size {
            return Err(EngineError::InvalidParameter {
                name: "limit".to_string(),
                message: format!("must be between 1 and {}", settings.limits.max_page_size),
            });
        }

        Ok(EmployeeListQuery {
            company: require_scope("company", self.company.as_deref())?,
            as_of: self.as_of_date.unwrap_or(today),
            filter: RecordFilter {
                branch: present(&self.branch),
                department: present(&self.department),
                designation: present(&self.designation),
                nationality_group: present(&self.nationality_group),
                is_national: self.national_flag()?,
            },
            search: present(&self.search),
            limit,
            offset: self.offset.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 31).unwrap()
    }

    #[test]
    fn test_months_back_bounds() {
        let settings = EngineSettings::default();
        assert_eq!(months_back(None, 12, &settings).unwrap(), 12);
        assert_eq!(months_back(Some(0), 12, &settings).unwrap(), 12);
        assert_eq!(months_back(Some(120), 12, &settings).unwrap(), 120);
        assert!(matches!(
            months_back(Some(121), 12, &settings),
            Err(EngineError::InvalidParameter { name, .. }) if name == "months_back"
        ));
    }

    fn parse<T: serde::de::DeserializeOwned>(query: &str) -> T {
        let uri: axum::http::Uri = format!("/report?{}", query).parse().unwrap();
        axum::extract::Query::<T>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_blank_typed_values_count_as_absent() {
        let query: FilterQuery = parse("company=Acme&as_of_date=&min_headcount=&months_back=");
        assert_eq!(query.as_of(today()), today());
        assert_eq!(query.min_headcount(&EngineSettings::default()), 3);
        assert_eq!(query.months_back, None);

        let query: EmployeeQuery = parse("company=Acme&as_of_date=%20&limit=&offset=");
        let list = query.into_list_query(&EngineSettings::default(), today()).unwrap();
        assert_eq!(list.as_of, today());
        assert_eq!(list.limit, 50);
    }

    #[test]
    fn test_typed_values_still_parse() {
        let query: DrilldownQuery = parse("company=Acme&as_of_date=2024-06-30&top_n=5");
        assert_eq!(
            query.as_of(today()),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
        assert_eq!(query.top_n, Some(5));

        let uri: axum::http::Uri = "/report?company=Acme&min_headcount=abc".parse().unwrap();
        assert!(axum::extract::Query::<FilterQuery>::try_from_uri(&uri).is_err());
    }

    #[test]
    fn test_filter_requires_company() {
        let query = FilterQuery {
            company: Some(" ".to_string()),
            ..FilterQuery::default()
        };
        assert!(matches!(query.filter(), Err(EngineError::MissingScope { .. })));
    }

    #[test]
    fn test_filter_drops_blank_dimensions() {
        let query = FilterQuery {
            company: Some("Acme".to_string()),
            department: Some("".to_string()),
            designation: Some(" Driver ".to_string()),
            ..FilterQuery::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.department, None);
        assert_eq!(filter.designation.as_deref(), Some("Driver"));
    }

    #[test]
    fn test_scope_selector_prefers_company() {
        let query = ScopeQuery {
            company: Some("Sub".to_string()),
            holding_company: Some("Holding".to_string()),
            ..ScopeQuery::default()
        };
        assert_eq!(query.selector(), ScopeSelector::Company("Sub".to_string()));
        assert_eq!(ScopeQuery::default().selector(), ScopeSelector::All);
    }

    #[test]
    fn test_employee_query_defaults() {
        let query = EmployeeQuery {
            company: Some("Acme".to_string()),
            is_national: Some("0".to_string()),
            ..EmployeeQuery::default()
        };
        let list = query.into_list_query(&EngineSettings::default(), today()).unwrap();
        assert_eq!(list.as_of, today());
        assert_eq!(list.limit, 50);
        assert_eq!(list.offset, 0);
        assert_eq!(list.filter.is_national, Some(false));
    }

    #[test]
    fn test_employee_query_rejects_bad_flag_and_page_size() {
        let bad_flag = EmployeeQuery {
            company: Some("Acme".to_string()),
            is_national: Some("maybe".to_string()),
            ..EmployeeQuery::default()
        };
        assert!(bad_flag.into_list_query(&EngineSettings::default(), today()).is_err());

        let too_big = EmployeeQuery {
            company: Some("Acme".to_string()),
            limit: Some(10_000),
            ..EmployeeQuery::default()
        };
        assert!(matches!(
            too_big.into_list_query(&EngineSettings::default(), today()),
            Err(EngineError::InvalidParameter { name, .. }) if name == "limit"
        ));
    }
}
