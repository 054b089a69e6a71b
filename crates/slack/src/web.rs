use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::transport::{ChatDirectoryApi, MessageSender, TransportError};

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

/// Slack Web API client. Covers the three calls the bot makes: the two
/// one-shot directory listings at bootstrap and outbound `chat.postMessage`.
pub struct SlackWebClient {
    http: Client,
    api_base: String,
    bot_token: SecretString,
}

#[derive(Debug, Deserialize)]
struct UsersListResponse {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    members: Vec<DirectoryEntryPayload>,
}

#[derive(Debug, Deserialize)]
struct ConversationsListResponse {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    channels: Vec<DirectoryEntryPayload>,
}

#[derive(Debug, Deserialize)]
struct DirectoryEntryPayload {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

impl SlackWebClient {
    pub fn new(bot_token: SecretString) -> Self {
        Self::with_api_base(bot_token, DEFAULT_API_BASE)
    }

    pub fn with_api_base(bot_token: SecretString, api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, TransportError> {
        debug!(method, "calling slack web api");
        let mut request = self
            .http
            .post(format!("{}/{method}", self.api_base))
            .bearer_auth(self.bot_token.expose_secret());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|error| TransportError::Send(format!("{method}: {error}")))?;
        response
            .json::<T>()
            .await
            .map_err(|error| TransportError::Receive(format!("{method}: {error}")))
    }
}

fn api_error(method: &str, error: Option<String>) -> TransportError {
    TransportError::Api(format!(
        "{method} failed: {}",
        error.unwrap_or_else(|| "unknown error".to_string())
    ))
}

#[async_trait]
impl ChatDirectoryApi for SlackWebClient {
    async fn list_users(&self) -> Result<Vec<(String, String)>, TransportError> {
        let response: UsersListResponse = self.call("users.list", None).await?;
        if !response.ok {
            return Err(api_error("users.list", response.error));
        }
        Ok(response.members.into_iter().map(|member| (member.id, member.name)).collect())
    }

    async fn list_conversations(&self) -> Result<Vec<(String, String)>, TransportError> {
        let response: ConversationsListResponse = self.call("conversations.list", None).await?;
        if !response.ok {
            return Err(api_error("conversations.list", response.error));
        }
        Ok(response.channels.into_iter().map(|channel| (channel.id, channel.name)).collect())
    }
}

#[async_trait]
impl MessageSender for SlackWebClient {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), TransportError> {
        let response: PostMessageResponse = self
            .call("chat.postMessage", Some(json!({ "channel": channel_id, "text": text })))
            .await?;
        if !response.ok {
            return Err(api_error("chat.postMessage", response.error));
        }
        Ok(())
    }
}
