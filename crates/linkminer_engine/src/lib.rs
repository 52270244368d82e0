//! Linkminer engine: backend I/O and effect execution.
mod channel;
mod engine;
mod record;
mod request;
mod settings;
mod sink;
mod socketio;
mod types;

pub use channel::{
    ChannelHandle, ChannelSignal, IngestionChannel, PushConnection, PushTransport, SignalDispatch,
};
pub use engine::EngineHandle;
pub use record::decode_record;
pub use request::{run_scrape, RequestController, ScrapeRequestBody};
pub use settings::{ClientSettings, DEFAULT_BACKEND_URL};
pub use sink::{ChannelEventSink, EventSink};
pub use socketio::{SocketIoTransport, RECORD_EVENT};
pub use types::{
    ChannelError, EngineError, EngineEvent, FailureKind, RecordFields, RequestId, ScrapeOutcome,
    SubmitError,
};
