use crate::RequestId;

/// Side effects requested by [`crate::update`]; executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartScrape { request_id: RequestId, query: String },
    CancelScrape { request_id: RequestId },
    OpenChannel,
    CloseChannel,
    Quit,
}
