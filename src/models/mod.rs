//! Core data models for the workforce compliance engine.
//!
//! Input records mirror what the external record store holds; output
//! types are the ephemeral rows and chart payloads the engine returns.

mod aggregate;
mod company;
mod employee;
mod policy;
mod salary;

pub use aggregate::{AggregateRow, ChartDataset, ChartPayload, ComplianceStatus};
pub use company::CompanyNode;
pub use employee::{EmployeeRecord, EmploymentStatus};
pub use policy::{DimensionType, PolicyLine, PolicyRecord};
pub use salary::{AssignmentState, SalaryAssignment};
