use std::sync::{Arc, Mutex};

use linkminer_logging::{client_error, client_info, client_warn};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    ClientSettings, EngineEvent, EventSink, FailureKind, RequestId, ScrapeOutcome, SubmitError,
};

/// Body of the scrape-start call. The field name is owned by the backend.
#[derive(Debug, Serialize)]
pub struct ScrapeRequestBody<'a> {
    pub indeed_page: &'a str,
}

struct InFlight {
    request_id: RequestId,
    token: CancellationToken,
}

/// Issues scrape-start requests and owns their cancellation tokens.
pub struct RequestController {
    client: reqwest::Client,
    settings: ClientSettings,
    sink: Arc<dyn EventSink>,
    current: Arc<Mutex<Option<InFlight>>>,
}

impl RequestController {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            settings,
            sink,
            current: Arc::new(Mutex::new(None)),
        })
    }

    /// Starts a request on the current tokio runtime.
    ///
    /// Exactly one `ScrapeSettled` event is emitted for `request_id`. A newer
    /// submit takes over the cancellation slot; the older request still settles.
    pub fn submit(&self, request_id: RequestId, query: String) -> JoinHandle<()> {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.replace(InFlight {
                request_id,
                token: token.clone(),
            }) {
                client_warn!(
                    "Request {} superseded by {} while still in flight",
                    previous.request_id,
                    request_id
                );
            }
        }

        let client = self.client.clone();
        let run_url = self.settings.run_url();
        let timeout = self.settings.request_timeout;
        let sink = self.sink.clone();
        let current = self.current.clone();

        tokio::spawn(async move {
            let outcome = match run_url {
                Ok(url) => run_scrape(&client, url, &query, timeout, &token).await,
                Err(err) => ScrapeOutcome::Failed(err),
            };

            if let Ok(mut slot) = current.lock() {
                if slot.as_ref().map(|in_flight| in_flight.request_id) == Some(request_id) {
                    *slot = None;
                }
            }

            match &outcome {
                ScrapeOutcome::Completed(_) => client_info!("Scraping completed (request {})", request_id),
                ScrapeOutcome::Cancelled => client_info!("Scrape request {} cancelled", request_id),
                ScrapeOutcome::Failed(err) => {
                    client_error!("Scrape request {} failed: {}", request_id, err)
                }
            }
            sink.emit(EngineEvent::ScrapeSettled {
                request_id,
                outcome,
            });
        })
    }

    /// Triggers the token of the current request. Returns whether anything
    /// was in flight.
    pub fn cancel(&self) -> bool {
        match self.current.lock() {
            Ok(current) => match current.as_ref() {
                Some(in_flight) => {
                    in_flight.token.cancel();
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Cancels only if `request_id` is still the current request.
    pub fn cancel_request(&self, request_id: RequestId) -> bool {
        match self.current.lock() {
            Ok(current) => match current.as_ref() {
                Some(in_flight) if in_flight.request_id == request_id => {
                    in_flight.token.cancel();
                    true
                }
                _ => false,
            },
            Err(_) => false,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.current
            .lock()
            .map(|current| current.is_some())
            .unwrap_or(false)
    }
}

/// Sends one scrape-start request and waits for its JSON answer or for
/// `token` to fire, whichever comes first.
///
/// A cancelled exchange is dropped mid-flight, so a late answer is never
/// observed.
pub async fn run_scrape(
    client: &reqwest::Client,
    url: Url,
    query: &str,
    timeout: Option<std::time::Duration>,
    token: &CancellationToken,
) -> ScrapeOutcome {
    let exchange = async {
        let mut request = client.post(url).json(&ScrapeRequestBody { indeed_page: query });
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice::<serde_json::Value>(&body)
            .map_err(|err| SubmitError::new(FailureKind::MalformedResponse, err.to_string()))
    };

    tokio::select! {
        biased;
        _ = token.cancelled() => ScrapeOutcome::Cancelled,
        result = exchange => match result {
            Ok(value) => ScrapeOutcome::Completed(value),
            Err(err) => ScrapeOutcome::Failed(err),
        },
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return SubmitError::new(FailureKind::MalformedResponse, err.to_string());
    }
    SubmitError::new(FailureKind::Network, err.to_string())
}
