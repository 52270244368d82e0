use linkminer_core::{Effect, Msg, ScrapeRecord, ScrapeResult};
use linkminer_engine::{ClientSettings, EngineError, EngineEvent, EngineHandle, ScrapeOutcome};
use linkminer_logging::client_info;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        client_info!("Backend at {}", settings.backend_url);
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    /// Executes effects in order. Returns `true` once `Effect::Quit` is seen.
    pub fn run(&self, effects: Vec<Effect>) -> bool {
        let mut quit = false;
        for effect in effects {
            match effect {
                Effect::StartScrape { request_id, query } => {
                    self.engine.submit(request_id, query);
                }
                Effect::CancelScrape { request_id } => {
                    client_info!("CancelScrape request_id={}", request_id);
                    self.engine.cancel(request_id);
                }
                Effect::OpenChannel => self.engine.open_channel(),
                Effect::CloseChannel => self.engine.close_channel(),
                Effect::Quit => quit = true,
            }
        }
        quit
    }

    /// Drains pending engine events as messages.
    pub fn poll(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        // The core enters `Connecting` when it asks for the channel.
        EngineEvent::ChannelConnecting => Msg::NoOp,
        EngineEvent::ChannelConnected => Msg::ChannelConnected,
        EngineEvent::ChannelDisconnected => Msg::ChannelDisconnected,
        EngineEvent::ChannelError(message) => Msg::ChannelError(message),
        EngineEvent::ChannelClosed => Msg::ChannelClosed,
        EngineEvent::RecordArrived(fields) => Msg::RecordReceived(ScrapeRecord::from_fields(fields)),
        EngineEvent::ScrapeSettled {
            request_id,
            outcome,
        } => Msg::ScrapeSettled {
            request_id,
            result: map_outcome(outcome),
        },
    }
}

fn map_outcome(outcome: ScrapeOutcome) -> ScrapeResult {
    match outcome {
        ScrapeOutcome::Completed(response) => ScrapeResult::Completed {
            response: response.to_string(),
        },
        ScrapeOutcome::Cancelled => ScrapeResult::Cancelled,
        ScrapeOutcome::Failed(err) => ScrapeResult::Failed {
            reason: err.to_string(),
        },
    }
}
