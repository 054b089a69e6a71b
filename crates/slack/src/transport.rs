use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport failed to connect: {0}")]
    Connect(String),
    #[error("transport read failed: {0}")]
    Receive(String),
    #[error("transport send failed: {0}")]
    Send(String),
    #[error("transport disconnect failed: {0}")]
    Disconnect(String),
    #[error("slack api rejected the call: {0}")]
    Api(String),
}

/// One inbound chat message: free-form text plus opaque sender and
/// conversation identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEvent {
    pub text: String,
    pub user_id: String,
    pub channel_id: String,
}

/// Inbound real-time stream lifecycle. The concrete WebSocket wiring is an
/// external collaborator; production wires a real implementation, tests use
/// scripted ones.
#[async_trait]
pub trait RtmTransport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;
    /// Next inbound message, or `None` once the stream is closed.
    async fn next_message(&self) -> Result<Option<MessageEvent>, TransportError>;
    async fn disconnect(&self) -> Result<(), TransportError>;
}

/// Outbound "send text to conversation" capability.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), TransportError>;
}

/// One-shot directory listings used at bootstrap to build the user and
/// conversation snapshots. Entries are `(id, display name)` pairs.
#[async_trait]
pub trait ChatDirectoryApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<(String, String)>, TransportError>;
    async fn list_conversations(&self) -> Result<Vec<(String, String)>, TransportError>;
}

#[derive(Default)]
pub struct NoopRtmTransport;

#[async_trait]
impl RtmTransport for NoopRtmTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_message(&self) -> Result<Option<MessageEvent>, TransportError> {
        Ok(None)
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
