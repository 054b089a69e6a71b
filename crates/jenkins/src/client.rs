use std::time::Duration;

use async_trait::async_trait;
use maestro_core::config::JenkinsConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{BuildPayload, JenkinsApi, JenkinsError, JobPayload, ViewPayload};

/// `reqwest`-backed Jenkins client using the `/api/json` endpoints with
/// HTTP basic auth (username + API token).
pub struct HttpJenkinsClient {
    http: Client,
    base_url: String,
    username: String,
    api_token: SecretString,
    timeout: Duration,
}

impl HttpJenkinsClient {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        api_token: SecretString,
        timeout: Duration,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            api_token,
            timeout,
        }
    }

    pub fn from_config(config: &JenkinsConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.username.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, JenkinsError> {
        debug!(path, "querying jenkins");
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(self.api_token.expose_secret()))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|error| JenkinsError::Request {
                path: path.to_string(),
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(JenkinsError::Status { status: status.as_u16(), path: path.to_string() });
        }

        response.json::<T>().await.map_err(|error| JenkinsError::Decode {
            path: path.to_string(),
            message: error.to_string(),
        })
    }
}

#[async_trait]
impl JenkinsApi for HttpJenkinsClient {
    async fn view(&self, name: &str) -> Result<ViewPayload, JenkinsError> {
        self.get_json(&format!("/view/{name}/api/json")).await
    }

    async fn job(&self, name: &str) -> Result<JobPayload, JenkinsError> {
        self.get_json(&format!("/job/{name}/api/json")).await
    }

    async fn build(&self, job: &str, number: u32) -> Result<BuildPayload, JenkinsError> {
        self.get_json(&format!("/job/{job}/{number}/api/json")).await
    }
}
