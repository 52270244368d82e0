use std::time::Duration;

use url::Url;

use crate::{FailureKind, SubmitError};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Host serving both the scrape endpoint and the push channel.
    pub backend_url: Url,
    /// Scrape-start endpoint, relative to `backend_url`.
    pub run_path: String,
    /// Socket.IO namespace of the push channel.
    pub namespace: String,
    pub connect_timeout: Duration,
    /// `None` means the scrape request waits until answered or cancelled.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend url"),
            run_path: "run".to_string(),
            namespace: "/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

impl ClientSettings {
    pub fn with_backend(backend_url: Url) -> Self {
        Self {
            backend_url,
            ..Self::default()
        }
    }

    pub fn run_url(&self) -> Result<Url, SubmitError> {
        self.backend_url
            .join(&self.run_path)
            .map_err(|err| SubmitError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}
