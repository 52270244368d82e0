use std::io::{self, BufRead};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use linkminer_core::{update, AppState, Msg};
use linkminer_engine::ClientSettings;
use linkminer_logging::{client_info, client_warn};

use super::effects::EffectRunner;
use super::input::{parse_line, to_msgs};
use super::ui::render::TerminalRenderer;

const TICK: Duration = Duration::from_millis(75);

pub fn run_app(settings: ClientSettings) -> anyhow::Result<()> {
    let effects = EffectRunner::new(settings)?;
    let result = run_loop(&effects);

    client_info!("Shutting down");
    effects.shutdown();
    result
}

fn run_loop(effects: &EffectRunner) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();

    spawn_stdin_reader(msg_tx.clone());
    // Mounting the view opens the push channel.
    let _ = msg_tx.send(Msg::ChannelOpenRequested);

    let mut state = AppState::new();
    let mut renderer = TerminalRenderer::new(io::stdout());
    renderer.render(&state.view())?;

    loop {
        let mut inbox = effects.poll();
        match msg_rx.recv_timeout(TICK) {
            Ok(msg) => inbox.push(msg),
            Err(RecvTimeoutError::Timeout) => inbox.push(Msg::Tick),
            Err(RecvTimeoutError::Disconnected) => inbox.push(Msg::QuitRequested),
        }

        for msg in inbox {
            let (next, pending) = update(std::mem::take(&mut state), msg);
            state = next;
            let quit = effects.run(pending);
            if state.consume_dirty() {
                renderer.render(&state.view())?;
            }
            if quit {
                return Ok(());
            }
        }
    }
}

fn spawn_stdin_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    client_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            for msg in to_msgs(parse_line(&line)) {
                if msg_tx.send(msg).is_err() {
                    return;
                }
            }
        }
        let _ = msg_tx.send(Msg::QuitRequested);
    });
}
