//! Slack Integration - real-time message interface for the status bot
//!
//! This crate provides the Slack side of maestro-bot:
//! - **Transport** (`transport`) - seams for the real-time stream, outbound
//!   sends, and the one-shot directory listings
//! - **Web** (`web`) - `reqwest` client for the Slack Web API
//!   (`users.list`, `conversations.list`, `chat.postMessage`)
//! - **Socket** (`socket`) - event loop with capped-backoff reconnection
//! - **Router** (`router`) - keyword intent classification and reply
//!   dispatch
//! - **Report** (`report`) - plain-text status report formatting
//!
//! # Architecture
//!
//! ```text
//! RTM stream → RtmRunner → MessageRouter → StatusClient (Jenkins)
//!                               ↓
//!                         report text → MessageSender
//! ```
//!
//! Directories of users and conversations are built once at bootstrap and
//! injected as immutable snapshots; handlers never mutate shared state.

pub mod report;
pub mod router;
pub mod socket;
pub mod transport;
pub mod web;

pub use router::{classify, Intent, MessageHandler, MessageRouter, RouteError};
pub use socket::{ReconnectPolicy, RtmRunner};
pub use transport::{ChatDirectoryApi, MessageEvent, MessageSender, RtmTransport, TransportError};
pub use web::SlackWebClient;
