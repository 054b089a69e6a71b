//! Jenkins Integration - build-status queries for one team view
//!
//! This crate wraps the Jenkins JSON API behind an async trait:
//! - **API** (`api`) - wire payloads and the `JenkinsApi` seam
//! - **Client** (`client`) - `reqwest`-backed implementation with basic auth
//! - **Status** (`status`) - the three queries the bot needs: per-view job
//!   listing, job-name list, and detailed single-job status with the
//!   contrasting build (last failure when green, last success when red)
//!
//! Raw color tokens are classified into [`maestro_core::BuildState`] at this
//! boundary; nothing above it ever sees a Jenkins color string.

pub mod api;
pub mod client;
pub mod status;

pub use api::{JenkinsApi, JenkinsError};
pub use client::HttpJenkinsClient;
pub use status::{DetailedStatus, StatusClient};
