use crate::view_model::{AppViewModel, RecordRowView};
use crate::{RecordLog, ScrapeRecord};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestLifecycle {
    #[default]
    Idle,
    InFlight,
    /// Token triggered; waiting for the engine to acknowledge.
    Cancelled,
    Completed,
    Failed,
}

impl RequestLifecycle {
    /// Spinner (cancel affordance) versus search icon.
    pub fn shows_spinner(self) -> bool {
        self == RequestLifecycle::InFlight
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeResult {
    /// Backend answered with JSON; kept opaque.
    Completed { response: String },
    Cancelled,
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Closed,
    Connecting,
    Open,
}

impl ChannelState {
    pub fn accepts_records(self) -> bool {
        matches!(self, ChannelState::Connecting | ChannelState::Open)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    lifecycle: RequestLifecycle,
    last_request_id: RequestId,
    current_request: Option<RequestId>,
    last_settled: Option<RequestLifecycle>,
    last_response: Option<String>,
    last_error: Option<String>,
    channel: ChannelState,
    records: RecordLog,
    quitting: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            input: self.input.clone(),
            lifecycle: self.lifecycle,
            last_settled: self.last_settled,
            last_response: self.last_response.clone(),
            last_error: self.last_error.clone(),
            channel: self.channel,
            record_count: self.records.len(),
            rows: self
                .records
                .iter()
                .enumerate()
                .map(|(index, record)| RecordRowView::project(index + 1, record))
                .collect(),
            quitting: self.quitting,
            dirty: self.dirty,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn lifecycle(&self) -> RequestLifecycle {
        self.lifecycle
    }

    pub fn channel(&self) -> ChannelState {
        self.channel
    }

    pub fn records(&self) -> &RecordLog {
        &self.records
    }

    pub fn current_request(&self) -> Option<RequestId> {
        self.current_request
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    /// Moves to `InFlight` and hands out the query to send; clears the input.
    pub(crate) fn begin_request(&mut self) -> (RequestId, String) {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.current_request = Some(request_id);
        self.lifecycle = RequestLifecycle::InFlight;
        self.last_error = None;
        self.mark_dirty();
        (request_id, std::mem::take(&mut self.input))
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.lifecycle = RequestLifecycle::Cancelled;
        self.mark_dirty();
    }

    pub(crate) fn settle(&mut self, result: ScrapeResult) {
        let outcome = if self.lifecycle == RequestLifecycle::Cancelled {
            RequestLifecycle::Cancelled
        } else {
            match result {
                ScrapeResult::Completed { response } => {
                    self.last_response = Some(response);
                    RequestLifecycle::Completed
                }
                ScrapeResult::Failed { reason } => {
                    self.last_error = Some(reason);
                    RequestLifecycle::Failed
                }
                ScrapeResult::Cancelled => RequestLifecycle::Cancelled,
            }
        };
        self.last_settled = Some(outcome);
        self.current_request = None;
        self.lifecycle = RequestLifecycle::Idle;
        self.mark_dirty();
    }

    pub(crate) fn set_channel(&mut self, channel: ChannelState) {
        if self.channel != channel {
            self.channel = channel;
            self.mark_dirty();
        }
    }

    pub(crate) fn append_record(&mut self, record: ScrapeRecord) {
        self.records.append(record);
        self.mark_dirty();
    }

    pub(crate) fn begin_quit(&mut self) {
        self.quitting = true;
        self.mark_dirty();
    }
}
