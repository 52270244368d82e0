use std::sync::Once;

use linkminer_core::{update, AppState, Effect, Msg, RequestLifecycle, ScrapeRecord, ScrapeResult};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(linkminer_logging::initialize_for_tests);
}

fn submit(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::SubmitClicked)
}

fn open_channel(state: AppState) -> AppState {
    let (state, _) = update(state, Msg::ChannelOpenRequested);
    let (state, _) = update(state, Msg::ChannelConnected);
    state
}

#[test]
fn submit_starts_request_and_clears_input() {
    init_logging();
    let (mut state, effects) = submit(AppState::new(), "node js developer");

    assert_eq!(
        effects,
        vec![Effect::StartScrape {
            request_id: 1,
            query: "node js developer".to_string(),
        }]
    );
    let view = state.view();
    assert_eq!(view.input, "");
    assert_eq!(view.lifecycle, RequestLifecycle::InFlight);
    assert!(view.lifecycle.shows_spinner());
    assert!(state.consume_dirty());
}

#[test]
fn empty_query_is_submitted_as_is() {
    init_logging();
    let (_state, effects) = update(AppState::new(), Msg::SubmitClicked);

    assert_eq!(
        effects,
        vec![Effect::StartScrape {
            request_id: 1,
            query: String::new(),
        }]
    );
}

#[test]
fn completed_request_returns_to_idle_and_keeps_response() {
    init_logging();
    let (state, _) = submit(AppState::new(), "rust");
    let (state, effects) = update(
        state,
        Msg::ScrapeSettled {
            request_id: 1,
            result: ScrapeResult::Completed {
                response: r#"{"status":"done"}"#.to_string(),
            },
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.lifecycle, RequestLifecycle::Idle);
    assert_eq!(view.last_settled, Some(RequestLifecycle::Completed));
    assert_eq!(view.last_response.as_deref(), Some(r#"{"status":"done"}"#));
    assert_eq!(view.last_error, None);
}

#[test]
fn failed_request_returns_to_idle_with_reason() {
    init_logging();
    let (state, _) = submit(AppState::new(), "rust");
    let (state, _) = update(
        state,
        Msg::ScrapeSettled {
            request_id: 1,
            result: ScrapeResult::Failed {
                reason: "http status 500".to_string(),
            },
        },
    );

    let view = state.view();
    assert_eq!(view.lifecycle, RequestLifecycle::Idle);
    assert_eq!(view.last_settled, Some(RequestLifecycle::Failed));
    assert_eq!(view.last_error.as_deref(), Some("http status 500"));
}

#[test]
fn cancel_when_idle_is_noop() {
    init_logging();
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::CancelClicked);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(next, state);
}

#[test]
fn cancel_twice_equals_cancel_once() {
    init_logging();
    let (state, _) = submit(AppState::new(), "rust");
    let (once, first) = update(state, Msg::CancelClicked);
    let (twice, second) = update(once.clone(), Msg::CancelClicked);

    assert_eq!(first, vec![Effect::CancelScrape { request_id: 1 }]);
    assert!(second.is_empty());
    assert_eq!(once.view().lifecycle, twice.view().lifecycle);
    assert!(!twice.view().lifecycle.shows_spinner());
}

#[test]
fn late_response_after_cancel_is_discarded() {
    init_logging();
    let (state, _) = submit(AppState::new(), "rust");
    let (state, _) = update(state, Msg::CancelClicked);
    assert_eq!(state.lifecycle(), RequestLifecycle::Cancelled);

    let (state, _) = update(
        state,
        Msg::ScrapeSettled {
            request_id: 1,
            result: ScrapeResult::Completed {
                response: "{}".to_string(),
            },
        },
    );

    let view = state.view();
    assert_eq!(view.lifecycle, RequestLifecycle::Idle);
    assert_eq!(view.last_settled, Some(RequestLifecycle::Cancelled));
    assert_eq!(view.last_response, None);
}

#[test]
fn submit_while_in_flight_is_rejected_and_input_kept() {
    init_logging();
    let (state, _) = submit(AppState::new(), "first");
    let (state, effects) = submit(state, "second");

    assert!(effects.is_empty());
    assert_eq!(state.view().input, "second");
    assert_eq!(state.current_request(), Some(1));
}

#[test]
fn resubmit_after_cancel_ignores_stale_settle() {
    init_logging();
    let (state, _) = submit(AppState::new(), "first");
    let (state, _) = update(state, Msg::CancelClicked);
    let (state, effects) = submit(state, "second");
    assert_eq!(
        effects,
        vec![Effect::StartScrape {
            request_id: 2,
            query: "second".to_string(),
        }]
    );

    let (state, _) = update(
        state,
        Msg::ScrapeSettled {
            request_id: 1,
            result: ScrapeResult::Cancelled,
        },
    );
    assert_eq!(state.lifecycle(), RequestLifecycle::InFlight);
    assert_eq!(state.current_request(), Some(2));
}

#[test]
fn request_transitions_never_clear_records() {
    init_logging();
    let state = open_channel(AppState::new());
    let (state, _) = update(
        state,
        Msg::RecordReceived(ScrapeRecord::from_fields([("Person Name", "Ada")])),
    );

    let (state, _) = submit(state, "first");
    let (state, _) = update(state, Msg::CancelClicked);
    let (state, _) = update(
        state,
        Msg::ScrapeSettled {
            request_id: 1,
            result: ScrapeResult::Cancelled,
        },
    );
    let (state, _) = submit(state, "second");

    assert_eq!(state.records().len(), 1);
}

#[test]
fn quit_cancels_in_flight_request_and_closes_channel() {
    init_logging();
    let state = open_channel(AppState::new());
    let (state, _) = submit(state, "rust");
    let (state, effects) = update(state, Msg::QuitRequested);

    assert_eq!(
        effects,
        vec![
            Effect::CancelScrape { request_id: 1 },
            Effect::CloseChannel,
            Effect::Quit,
        ]
    );
    assert!(state.is_quitting());

    let (_state, effects) = submit(state, "ignored");
    assert!(effects.is_empty());
}

#[test]
fn quit_when_idle_and_closed_only_quits() {
    init_logging();
    let (_state, effects) = update(AppState::new(), Msg::QuitRequested);
    assert_eq!(effects, vec![Effect::Quit]);
}
