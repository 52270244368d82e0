use linkminer_logging::{client_debug, client_info, client_warn};

use crate::{AppState, ChannelState, Effect, Msg, RequestLifecycle};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.is_quitting() {
                return (state, Vec::new());
            }
            // Single request per controller: a second submit is rejected, not queued.
            if state.lifecycle() == RequestLifecycle::InFlight {
                client_warn!(
                    "Submit rejected: request {:?} still in flight",
                    state.current_request()
                );
                return (state, Vec::new());
            }
            let (request_id, query) = state.begin_request();
            client_info!("StartScrape request_id={} query_len={}", request_id, query.len());
            vec![Effect::StartScrape { request_id, query }]
        }
        Msg::CancelClicked => match (state.lifecycle(), state.current_request()) {
            (RequestLifecycle::InFlight, Some(request_id)) => {
                state.mark_cancelled();
                vec![Effect::CancelScrape { request_id }]
            }
            _ => Vec::new(),
        },
        Msg::ScrapeSettled { request_id, result } => {
            if state.current_request() == Some(request_id) {
                state.settle(result);
            } else {
                client_debug!("Ignoring settle for superseded request {}", request_id);
            }
            Vec::new()
        }
        Msg::ChannelOpenRequested => {
            if state.channel() == ChannelState::Closed && !state.is_quitting() {
                state.set_channel(ChannelState::Connecting);
                vec![Effect::OpenChannel]
            } else {
                Vec::new()
            }
        }
        Msg::ChannelConnected => {
            if state.channel() == ChannelState::Connecting {
                state.set_channel(ChannelState::Open);
            }
            Vec::new()
        }
        // Disconnects and errors are reported by the engine log only.
        Msg::ChannelDisconnected | Msg::ChannelError(_) => Vec::new(),
        Msg::ChannelClosed => {
            state.set_channel(ChannelState::Closed);
            Vec::new()
        }
        Msg::RecordReceived(record) => {
            if state.channel().accepts_records() {
                state.append_record(record);
            } else {
                client_debug!("Dropping record received on a closed channel");
            }
            Vec::new()
        }
        Msg::QuitRequested => {
            if state.is_quitting() {
                return (state, Vec::new());
            }
            state.begin_quit();
            let mut effects = Vec::with_capacity(3);
            if let (RequestLifecycle::InFlight, Some(request_id)) =
                (state.lifecycle(), state.current_request())
            {
                state.mark_cancelled();
                effects.push(Effect::CancelScrape { request_id });
            }
            if state.channel() != ChannelState::Closed {
                effects.push(Effect::CloseChannel);
            }
            effects.push(Effect::Quit);
            effects
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
