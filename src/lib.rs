//! Workforce composition and nationalization compliance engine
//!
//! This crate reconstructs point-in-time workforce composition from employee
//! records, resolves the compliance policy in force, and serves the resulting
//! reports over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod reports;
pub mod store;
