//! Linkminer core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use record::{RecordLog, ScrapeRecord};
pub use state::{AppState, ChannelState, RequestId, RequestLifecycle, ScrapeResult};
pub use update::update;
pub use view_model::{AppViewModel, RecordRowView, RECORD_COLUMNS, SERIAL_COLUMN};
