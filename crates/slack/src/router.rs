use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use maestro_core::domain::Directory;
use maestro_jenkins::{JenkinsApi, JenkinsError, StatusClient};
use thiserror::Error;
use tracing::{debug, info};

use crate::report;
use crate::transport::{MessageEvent, MessageSender, TransportError};

/// The three message intents, in precedence order. First match wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    GreetingReport,
    StatusSummary,
    JobDetail(String),
}

/// Classifies inbound text by case-insensitive keyword containment.
///
/// Precedence is fixed: greeting-report, then status-summary, then a known
/// job name mentioned anywhere in the text. Job matching follows the order
/// of the startup-fetched job list, not the position in the message.
pub fn classify(text: &str, job_names: &[String]) -> Option<Intent> {
    let lowered = text.to_lowercase();

    if lowered.contains("gm") && (lowered.contains("hoje") || lowered.contains("criada")) {
        return Some(Intent::GreetingReport);
    }

    if lowered.contains("jenkins") && lowered.contains("status") {
        return Some(Intent::StatusSummary);
    }

    job_names
        .iter()
        .find(|name| lowered.contains(&name.to_lowercase()))
        .map(|name| Intent::JobDetail(name.clone()))
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Jenkins(#[from] JenkinsError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Handler seam between the event loop and the router; lets runner tests
/// pump scripted streams into a counting fake.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle_message(&self, event: &MessageEvent) -> Result<(), RouteError>;
}

/// Classifies each inbound message and replies to the originating
/// conversation. All state is an immutable snapshot taken at bootstrap.
pub struct MessageRouter<A> {
    users: Arc<Directory>,
    conversations: Arc<Directory>,
    job_names: Vec<String>,
    status: StatusClient<A>,
    sender: Arc<dyn MessageSender>,
    jenkins_base_url: String,
}

impl<A: JenkinsApi> MessageRouter<A> {
    pub fn new(
        users: Arc<Directory>,
        conversations: Arc<Directory>,
        job_names: Vec<String>,
        status: StatusClient<A>,
        sender: Arc<dyn MessageSender>,
        jenkins_base_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            conversations,
            job_names,
            status,
            sender,
            jenkins_base_url: jenkins_base_url.into(),
        }
    }
}

#[async_trait]
impl<A: JenkinsApi> MessageHandler for MessageRouter<A> {
    async fn handle_message(&self, event: &MessageEvent) -> Result<(), RouteError> {
        let user = self.users.display_name(&event.user_id);
        let conversation = self.conversations.display_name(&event.channel_id);
        debug!(
            user = user.unwrap_or("unknown"),
            conversation = conversation.unwrap_or("unknown"),
            "received message"
        );

        let Some(intent) = classify(&event.text, &self.job_names) else {
            return Ok(());
        };
        info!(intent = ?intent, channel_id = %event.channel_id, "classified message");

        let reply = match intent {
            Intent::GreetingReport => {
                let jobs = self.status.view_statuses().await?;
                report::greeting_report(user, &jobs)
            }
            Intent::StatusSummary => {
                let jobs = self.status.view_statuses().await?;
                report::status_summary(user, &jobs)
            }
            Intent::JobDetail(job_name) => {
                let detail = self.status.detailed_status(&job_name).await?;
                report::job_detail(user, &detail, &self.users, &self.jenkins_base_url, Utc::now())
            }
        };

        self.sender.send_message(&event.channel_id, &reply).await?;
        Ok(())
    }
}
