use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::router::MessageHandler;
use crate::transport::{NoopRtmTransport, RtmTransport, TransportError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

/// Real-time message loop: connects the transport, pumps inbound messages
/// into the handler, and reconnects with capped exponential backoff when the
/// transport fails. Handler failures are logged and do not stop the loop.
pub struct RtmRunner {
    transport: Arc<dyn RtmTransport>,
    handler: Arc<dyn MessageHandler>,
    reconnect_policy: ReconnectPolicy,
}

impl RtmRunner {
    pub fn new(
        transport: Arc<dyn RtmTransport>,
        handler: Arc<dyn MessageHandler>,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self { transport, handler, reconnect_policy }
    }

    pub fn with_noop_transport(handler: Arc<dyn MessageHandler>) -> Self {
        Self::new(Arc::new(NoopRtmTransport), handler, ReconnectPolicy::default())
    }

    pub async fn start(&self) -> Result<()> {
        for attempt in 0..=self.reconnect_policy.max_retries {
            match self.connect_and_pump(attempt).await {
                Ok(()) => return Ok(()),
                Err(transport_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %transport_error,
                        "rtm transport failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "rtm retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn connect_and_pump(&self, attempt: u32) -> Result<(), TransportError> {
        info!(attempt, "opening rtm transport connection");
        self.transport.connect().await?;
        info!(attempt, "rtm transport connected");

        loop {
            let Some(event) = self.transport.next_message().await? else {
                info!(attempt, "rtm transport stream closed");
                self.transport.disconnect().await?;
                return Ok(());
            };

            // Slack delivers subtype events (joins, edits) without text.
            if event.text.is_empty() {
                debug!(channel_id = %event.channel_id, "skipping message without text");
                continue;
            }

            if let Err(error) = self.handler.handle_message(&event).await {
                warn!(
                    channel_id = %event.channel_id,
                    error = %error,
                    "message handling failed; continuing rtm loop"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::{ReconnectPolicy, RtmRunner};
    use crate::router::{MessageHandler, RouteError};
    use crate::transport::{MessageEvent, RtmTransport, TransportError};

    struct ScriptedTransport {
        state: Mutex<ScriptedState>,
    }

    #[derive(Default)]
    struct ScriptedState {
        connect_results: VecDeque<Result<(), TransportError>>,
        messages: VecDeque<Result<Option<MessageEvent>, TransportError>>,
        connect_attempts: usize,
        disconnect_calls: usize,
    }

    impl ScriptedTransport {
        fn with_script(
            connect_results: Vec<Result<(), TransportError>>,
            messages: Vec<Result<Option<MessageEvent>, TransportError>>,
        ) -> Self {
            Self {
                state: Mutex::new(ScriptedState {
                    connect_results: connect_results.into(),
                    messages: messages.into(),
                    ..ScriptedState::default()
                }),
            }
        }

        async fn connect_attempts(&self) -> usize {
            self.state.lock().await.connect_attempts
        }

        async fn disconnect_calls(&self) -> usize {
            self.state.lock().await.disconnect_calls
        }
    }

    #[async_trait]
    impl RtmTransport for ScriptedTransport {
        async fn connect(&self) -> Result<(), TransportError> {
            let mut state = self.state.lock().await;
            state.connect_attempts += 1;
            state.connect_results.pop_front().unwrap_or(Ok(()))
        }

        async fn next_message(&self) -> Result<Option<MessageEvent>, TransportError> {
            let mut state = self.state.lock().await;
            state.messages.pop_front().unwrap_or(Ok(None))
        }

        async fn disconnect(&self) -> Result<(), TransportError> {
            let mut state = self.state.lock().await;
            state.disconnect_calls += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingHandler {
        handled: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageHandler for CountingHandler {
        async fn handle_message(&self, event: &MessageEvent) -> Result<(), RouteError> {
            self.handled.lock().await.push(event.text.clone());
            if self.fail {
                return Err(RouteError::Transport(TransportError::Send("scripted".to_string())));
            }
            Ok(())
        }
    }

    fn message(text: &str) -> Result<Option<MessageEvent>, TransportError> {
        Ok(Some(MessageEvent {
            text: text.to_string(),
            user_id: "U1".to_string(),
            channel_id: "C1".to_string(),
        }))
    }

    #[tokio::test]
    async fn reconnects_after_initial_connect_failure() {
        let transport = Arc::new(ScriptedTransport::with_script(
            vec![Err(TransportError::Connect("network down".to_string())), Ok(())],
            vec![message("jenkins status"), Ok(None)],
        ));
        let handler = Arc::new(CountingHandler::default());

        let runner = RtmRunner::new(
            transport.clone(),
            handler.clone(),
            ReconnectPolicy { max_retries: 2, base_delay_ms: 0, max_delay_ms: 0 },
        );

        runner.start().await.expect("runner should not fail");

        assert_eq!(transport.connect_attempts().await, 2);
        assert_eq!(transport.disconnect_calls().await, 1);
        assert_eq!(*handler.handled.lock().await, vec!["jenkins status".to_string()]);
    }

    #[tokio::test]
    async fn exhausts_retries_without_crashing() {
        let transport = Arc::new(ScriptedTransport::with_script(
            vec![
                Err(TransportError::Connect("fail-1".to_string())),
                Err(TransportError::Connect("fail-2".to_string())),
                Err(TransportError::Connect("fail-3".to_string())),
            ],
            vec![],
        ));
        let handler = Arc::new(CountingHandler::default());

        let runner = RtmRunner::new(
            transport.clone(),
            handler,
            ReconnectPolicy { max_retries: 2, base_delay_ms: 0, max_delay_ms: 0 },
        );

        runner.start().await.expect("runner should degrade gracefully");
        assert_eq!(transport.connect_attempts().await, 3);
    }

    #[tokio::test]
    async fn skips_events_without_text() {
        let transport = Arc::new(ScriptedTransport::with_script(
            vec![Ok(())],
            vec![message(""), message("gm de hoje"), Ok(None)],
        ));
        let handler = Arc::new(CountingHandler::default());

        let runner = RtmRunner::new(
            transport.clone(),
            handler.clone(),
            ReconnectPolicy { max_retries: 0, base_delay_ms: 0, max_delay_ms: 0 },
        );

        runner.start().await.expect("runner");

        assert_eq!(*handler.handled.lock().await, vec!["gm de hoje".to_string()]);
    }

    #[tokio::test]
    async fn handler_failures_do_not_stop_the_loop() {
        let transport = Arc::new(ScriptedTransport::with_script(
            vec![Ok(())],
            vec![message("jenkins status"), message("gm criada"), Ok(None)],
        ));
        let handler = Arc::new(CountingHandler { fail: true, ..CountingHandler::default() });

        let runner = RtmRunner::new(
            transport.clone(),
            handler.clone(),
            ReconnectPolicy { max_retries: 0, base_delay_ms: 0, max_delay_ms: 0 },
        );

        runner.start().await.expect("runner");

        assert_eq!(handler.handled.lock().await.len(), 2);
        assert_eq!(transport.disconnect_calls().await, 1);
    }
}
