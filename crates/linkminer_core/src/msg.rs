#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the query input.
    InputChanged(String),
    /// User pressed the search affordance (or Enter).
    SubmitClicked,
    /// User pressed the spinner to abandon the running scrape.
    CancelClicked,
    /// Engine finished a scrape request, one way or another.
    ScrapeSettled {
        request_id: crate::RequestId,
        result: crate::ScrapeResult,
    },
    /// View mounted; the push channel should be opened.
    ChannelOpenRequested,
    ChannelConnected,
    ChannelDisconnected,
    ChannelError(String),
    ChannelClosed,
    /// One record pushed by the backend.
    RecordReceived(crate::ScrapeRecord),
    /// View is unmounting; release everything.
    QuitRequested,
    /// UI/render tick to coalesce rendering.
    Tick,
    NoOp,
}
