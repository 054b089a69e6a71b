use chrono::{DateTime, Utc};
use maestro_core::domain::{
    BuildInfo, BuildRef, BuildState, Culprit, HealthReport, JobDetail, JobSummary,
};
use tracing::debug;

use crate::api::{BuildPayload, BuildRefPayload, JenkinsApi, JenkinsError, JobPayload};

/// Detailed single-job status: metadata, the latest build, and the
/// *contrasting* build. When the job is currently passing the contrast is the
/// last unsuccessful build (how long has it been green); when it is broken
/// the contrast is the last successful build. Either can be absent for jobs
/// that have never failed or never succeeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailedStatus {
    pub job: JobDetail,
    pub last_build: Option<BuildInfo>,
    pub contrast_build: Option<BuildInfo>,
}

/// The three queries the bot needs, scoped to one named view.
pub struct StatusClient<A> {
    api: A,
    view: String,
}

impl<A: JenkinsApi> StatusClient<A> {
    pub fn new(api: A, view: impl Into<String>) -> Self {
        Self { api, view: view.into() }
    }

    pub fn view_name(&self) -> &str {
        &self.view
    }

    /// Lists every job in the view with its classified state, in view order.
    pub async fn view_statuses(&self) -> Result<Vec<JobSummary>, JenkinsError> {
        let view = self.api.view(&self.view).await?;
        Ok(view
            .jobs
            .into_iter()
            .map(|job| JobSummary::from_color(job.name, &job.color))
            .collect())
    }

    /// Same view query, projected to job names only.
    pub async fn job_names(&self) -> Result<Vec<String>, JenkinsError> {
        let view = self.api.view(&self.view).await?;
        Ok(view.jobs.into_iter().map(|job| job.name).collect())
    }

    /// Fetches job metadata, its latest build, and the contrasting build.
    pub async fn detailed_status(&self, job_name: &str) -> Result<DetailedStatus, JenkinsError> {
        let payload = self.api.job(job_name).await?;
        let job = map_job(job_name, &payload);

        let last_build = self.fetch_build(job_name, payload.last_build).await?;
        let contrast_ref = if job.state.is_passing() {
            payload.last_unsuccessful_build
        } else {
            payload.last_successful_build
        };
        let contrast_build = self.fetch_build(job_name, contrast_ref).await?;

        debug!(
            job = job_name,
            state = ?job.state,
            last_build = last_build.as_ref().map(|build| build.number),
            contrast_build = contrast_build.as_ref().map(|build| build.number),
            "resolved detailed job status"
        );

        Ok(DetailedStatus { job, last_build, contrast_build })
    }

    async fn fetch_build(
        &self,
        job_name: &str,
        reference: Option<BuildRefPayload>,
    ) -> Result<Option<BuildInfo>, JenkinsError> {
        let Some(reference) = reference else {
            return Ok(None);
        };
        let payload = self.api.build(job_name, reference.number).await?;
        Ok(Some(map_build(payload)))
    }
}

fn map_job(name: &str, payload: &JobPayload) -> JobDetail {
    JobDetail {
        name: name.to_string(),
        display_name: payload
            .display_name
            .clone()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| name.to_string()),
        state: BuildState::from_color(&payload.color),
        health: payload
            .health_report
            .iter()
            .map(|entry| HealthReport {
                score: entry.score,
                description: entry.description.clone(),
                icon: entry.icon_class_name.clone(),
            })
            .collect(),
        last_build: payload.last_build.map(|build| BuildRef { number: build.number }),
        last_successful_build: payload
            .last_successful_build
            .map(|build| BuildRef { number: build.number }),
        last_unsuccessful_build: payload
            .last_unsuccessful_build
            .map(|build| BuildRef { number: build.number }),
    }
}

fn map_build(payload: BuildPayload) -> BuildInfo {
    BuildInfo {
        number: payload.number,
        timestamp: payload.timestamp.and_then(millis_to_datetime),
        culprits: payload
            .culprits
            .into_iter()
            .map(|culprit| Culprit {
                full_name: culprit.full_name,
                absolute_url: culprit.absolute_url,
            })
            .collect(),
    }
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}
