use crate::{ChannelState, RequestLifecycle, ScrapeRecord};

/// Heading of the leading arrival-index column.
pub const SERIAL_COLUMN: &str = "S.No";

/// Record fields projected into the table, in display order.
pub const RECORD_COLUMNS: [&str; 9] = [
    "Company LinkedIn URL",
    "Company Name",
    "Company URL",
    "Designation",
    "Job Title",
    "Location",
    "Person LinkedIn URL",
    "Person Name",
    "Email",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub lifecycle: RequestLifecycle,
    pub last_settled: Option<RequestLifecycle>,
    pub last_response: Option<String>,
    pub last_error: Option<String>,
    pub channel: ChannelState,
    pub record_count: usize,
    pub rows: Vec<RecordRowView>,
    pub quitting: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    /// 1-based arrival position.
    pub serial: usize,
    /// One cell per entry of [`RECORD_COLUMNS`].
    pub cells: Vec<String>,
}

impl RecordRowView {
    pub(crate) fn project(serial: usize, record: &ScrapeRecord) -> Self {
        Self {
            serial,
            cells: RECORD_COLUMNS
                .iter()
                .map(|column| record.cell(column).to_string())
                .collect(),
        }
    }
}
