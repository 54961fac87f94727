//! Configuration loading and management for the compliance engine.
//!
//! Settings are read from a single YAML file. Every value has a default,
//! so callers that only need the stock behaviour can use
//! [`EngineSettings::default`].
//!
//! # Example
//!
//! ```no_run
//! use workforce_compliance::config::SettingsLoader;
//!
//! let loader = SettingsLoader::load("./config/settings.yaml").unwrap();
//! println!("Trend window: {} months", loader.settings().defaults.trend_months_back);
//! ```

mod loader;
mod types;

pub(crate) use loader::load_yaml;
pub use loader::SettingsLoader;
pub use types::{ClassificationSettings, EngineSettings, QueryDefaults, ReportLimits};
