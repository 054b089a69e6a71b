pub mod config;
pub mod domain;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use domain::{
    BuildInfo, BuildRef, BuildState, Culprit, Directory, HealthReport, JobDetail, JobSummary,
};
