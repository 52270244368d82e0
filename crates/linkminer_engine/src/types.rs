use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub type RequestId = u64;

/// Field name to display string, as decoded from one pushed record.
pub type RecordFields = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ChannelConnecting,
    ChannelConnected,
    ChannelDisconnected,
    ChannelError(String),
    ChannelClosed,
    RecordArrived(RecordFields),
    ScrapeSettled {
        request_id: RequestId,
        outcome: ScrapeOutcome,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    /// Parsed but otherwise untyped backend response.
    Completed(serde_json::Value),
    Cancelled,
    Failed(SubmitError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub kind: FailureKind,
    pub message: String,
}

impl SubmitError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for SubmitError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("push channel connect failed: {0}")]
    Connect(String),
    #[error("push channel connect timed out after {0:?}")]
    ConnectTimeout(Duration),
    #[error("push channel disconnect failed: {0}")]
    Disconnect(String),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(SubmitError),
}
