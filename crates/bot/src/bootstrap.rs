use std::sync::Arc;

use maestro_core::config::{AppConfig, ConfigError, LoadOptions};
use maestro_core::domain::Directory;
use maestro_jenkins::{HttpJenkinsClient, StatusClient};
use maestro_slack::{ChatDirectoryApi, MessageRouter, RtmRunner, SlackWebClient, TransportError};
use thiserror::Error;
use tracing::{info, warn};

pub struct Application {
    pub config: AppConfig,
    pub runner: RtmRunner,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("directory listing failed: {0}")]
    Directory(#[from] TransportError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(view = %config.jenkins.view, "starting application bootstrap");

    let web = Arc::new(SlackWebClient::new(config.slack.bot_token.clone()));
    let (users, conversations) = load_directories(web.as_ref()).await?;
    info!(
        users = users.len(),
        conversations = conversations.len(),
        "directory snapshots loaded"
    );

    let status =
        StatusClient::new(HttpJenkinsClient::from_config(&config.jenkins), config.jenkins.view.clone());

    // A broken Jenkins at startup only disables the job-detail intent; the
    // keyword intents keep working and report the failure when queried.
    let job_names = match status.job_names().await {
        Ok(names) => {
            info!(jobs = names.len(), "job name list loaded");
            names
        }
        Err(error) => {
            warn!(error = %error, "could not load job names; job-detail intent disabled");
            Vec::new()
        }
    };

    let router = MessageRouter::new(
        Arc::new(users),
        Arc::new(conversations),
        job_names,
        status,
        web,
        config.jenkins.base_url.clone(),
    );
    let runner = RtmRunner::with_noop_transport(Arc::new(router));

    Ok(Application { config, runner })
}

/// Both startup listings must succeed; without them every reply would be
/// anonymous and culprit mentions could never resolve.
async fn load_directories(
    api: &dyn ChatDirectoryApi,
) -> Result<(Directory, Directory), TransportError> {
    let users = Directory::from_entries(api.list_users().await?);
    let conversations = Directory::from_entries(api.list_conversations().await?);
    Ok((users, conversations))
}
