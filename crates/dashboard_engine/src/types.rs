use std::fmt;
use std::sync::mpsc;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// How progress notifications reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTransport {
    /// Persistent socket.io subscription to the `progress` event.
    SocketIo,
    /// Poll `GET /data/scraping-progress` after each successful trigger.
    Poll { interval: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// No limit when `None`; a trigger request may legitimately run as long as the scrape.
    pub request_timeout: Option<Duration>,
    pub transport: ProgressTransport,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            transport: ProgressTransport::SocketIo,
        }
    }
}

/// One company row as served by `GET /data`.
///
/// `id` is not part of the payload: it is the record's position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CompanyRecord {
    #[serde(skip)]
    pub id: usize,
    #[serde(deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub phone: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub fax: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub website: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub address: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub activity: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub manager: String,
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RecordsListed(Result<Vec<CompanyRecord>, ApiError>),
    ScrapeTriggered(Result<(), ApiError>),
    RecordsCleared(Result<(), ApiError>),
    Progress(u8),
    Channel(ChannelState),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid engine settings: {0}")]
    Settings(#[from] ApiError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    HttpStatus(u16),
    InvalidResponse,
    InvalidUrl,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
        }
    }
}
