use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum JenkinsError {
    #[error("jenkins request failed for `{path}`: {message}")]
    Request { path: String, message: String },
    #[error("jenkins returned HTTP {status} for `{path}`")]
    Status { status: u16, path: String },
    #[error("jenkins payload for `{path}` could not be decoded: {message}")]
    Decode { path: String, message: String },
}

/// View listing: `/view/{name}/api/json`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ViewPayload {
    #[serde(default)]
    pub jobs: Vec<ViewJobPayload>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ViewJobPayload {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Job metadata: `/job/{name}/api/json`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub health_report: Vec<HealthReportPayload>,
    #[serde(default)]
    pub last_build: Option<BuildRefPayload>,
    #[serde(default)]
    pub last_successful_build: Option<BuildRefPayload>,
    #[serde(default)]
    pub last_unsuccessful_build: Option<BuildRefPayload>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthReportPayload {
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_class_name: String,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct BuildRefPayload {
    pub number: u32,
}

/// Build detail: `/job/{name}/{number}/api/json`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildPayload {
    pub number: u32,
    /// Milliseconds since the epoch, as Jenkins reports it.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub culprits: Vec<CulpritPayload>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CulpritPayload {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub absolute_url: String,
}

/// The Jenkins query surface the status client depends on. Implemented by
/// [`crate::HttpJenkinsClient`] in production and by in-memory fakes in tests.
#[async_trait]
pub trait JenkinsApi: Send + Sync {
    async fn view(&self, name: &str) -> Result<ViewPayload, JenkinsError>;
    async fn job(&self, name: &str) -> Result<JobPayload, JenkinsError>;
    async fn build(&self, job: &str, number: u32) -> Result<BuildPayload, JenkinsError>;
}

#[cfg(test)]
mod tests {
    use super::{BuildPayload, JobPayload, ViewPayload};

    #[test]
    fn view_payload_decodes_name_and_color() {
        let payload: ViewPayload = serde_json::from_str(
            r#"{"name":"MAESTRO","jobs":[{"name":"maestro-api","color":"blue_anime"}]}"#,
        )
        .expect("decode");

        assert_eq!(payload.jobs.len(), 1);
        assert_eq!(payload.jobs[0].name, "maestro-api");
        assert_eq!(payload.jobs[0].color, "blue_anime");
    }

    #[test]
    fn job_payload_tolerates_missing_build_references() {
        let payload: JobPayload = serde_json::from_str(
            r#"{"name":"maestro-api","color":"notbuilt","healthReport":[]}"#,
        )
        .expect("decode");

        assert!(payload.last_build.is_none());
        assert!(payload.last_successful_build.is_none());
        assert!(payload.last_unsuccessful_build.is_none());
    }

    #[test]
    fn build_payload_decodes_culprit_attribution() {
        let payload: BuildPayload = serde_json::from_str(
            r#"{
                "number": 42,
                "timestamp": 1756200000000,
                "culprits": [
                    {"fullName": "John Doe", "absoluteUrl": "http://jenkins.example.net:8080/user/john.doe"}
                ]
            }"#,
        )
        .expect("decode");

        assert_eq!(payload.number, 42);
        assert_eq!(payload.culprits[0].full_name, "John Doe");
    }
}
