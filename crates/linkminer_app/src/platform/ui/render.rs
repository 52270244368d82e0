use std::io::{self, Write};

use linkminer_core::{
    AppViewModel, ChannelState, RecordRowView, RequestLifecycle, RECORD_COLUMNS, SERIAL_COLUMN,
};

const CELL_WIDTH: usize = 24;
const SERIAL_WIDTH: usize = 5;

/// Append-only terminal view: the status line is reprinted when it changes,
/// table rows are printed once as they arrive.
pub struct TerminalRenderer<W: Write> {
    out: W,
    header_printed: bool,
    rows_printed: usize,
    last_status: Option<String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_printed: false,
            rows_printed: 0,
            last_status: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        let status = status_line(view);
        if self.last_status.as_deref() != Some(status.as_str()) {
            writeln!(self.out, "{status}")?;
            self.last_status = Some(status);
        }

        if self.rows_printed < view.rows.len() {
            if !self.header_printed {
                writeln!(self.out, "{}", header_line())?;
                self.header_printed = true;
            }
            for row in &view.rows[self.rows_printed..] {
                writeln!(self.out, "{}", format_row(row))?;
            }
            self.rows_printed = view.rows.len();
        }

        self.out.flush()
    }
}

pub fn status_line(view: &AppViewModel) -> String {
    let affordance = if view.lifecycle.shows_spinner() {
        "[scraping… :cancel]"
    } else {
        "[search]"
    };
    let channel = match view.channel {
        ChannelState::Closed => "offline",
        ChannelState::Connecting => "connecting",
        ChannelState::Open => "live",
    };
    let mut line = format!(
        "{affordance} channel: {channel} | records: {}",
        view.record_count
    );

    match (view.lifecycle, view.last_settled) {
        (RequestLifecycle::Cancelled, _) => line.push_str(" | cancelling"),
        (RequestLifecycle::Idle, Some(RequestLifecycle::Completed)) => {
            line.push_str(" | last scrape completed")
        }
        (RequestLifecycle::Idle, Some(RequestLifecycle::Cancelled)) => {
            line.push_str(" | last scrape cancelled")
        }
        (RequestLifecycle::Idle, Some(RequestLifecycle::Failed)) => {
            line.push_str(" | last scrape failed");
            if let Some(reason) = &view.last_error {
                line.push_str(": ");
                line.push_str(reason);
            }
        }
        _ => {}
    }
    line
}

pub fn header_line() -> String {
    let mut line = pad(SERIAL_COLUMN, SERIAL_WIDTH);
    for column in RECORD_COLUMNS {
        line.push_str(" | ");
        line.push_str(&pad(column, CELL_WIDTH));
    }
    line.trim_end().to_string()
}

pub fn format_row(row: &RecordRowView) -> String {
    let mut line = pad(&row.serial.to_string(), SERIAL_WIDTH);
    for cell in &row.cells {
        line.push_str(" | ");
        line.push_str(&pad(cell, CELL_WIDTH));
    }
    line.trim_end().to_string()
}

/// Fits `text` into exactly `width` columns, eliding the tail.
fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    } else {
        format!("{text:<width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkminer_core::{update, AppState, Msg, ScrapeRecord, ScrapeResult};

    fn open_state() -> AppState {
        let (state, _) = update(AppState::new(), Msg::ChannelOpenRequested);
        update(state, Msg::ChannelConnected).0
    }

    #[test]
    fn spinner_shows_only_while_in_flight() {
        let (state, _) = update(open_state(), Msg::SubmitClicked);
        assert!(status_line(&state.view()).starts_with("[scraping"));

        let (state, _) = update(state, Msg::CancelClicked);
        let line = status_line(&state.view());
        assert!(line.starts_with("[search]"));
        assert!(line.ends_with("cancelling"));
    }

    #[test]
    fn failure_reason_is_shown() {
        let (state, _) = update(open_state(), Msg::SubmitClicked);
        let (state, _) = update(
            state,
            Msg::ScrapeSettled {
                request_id: 1,
                result: ScrapeResult::Failed {
                    reason: "network error: connection refused".to_string(),
                },
            },
        );

        assert_eq!(
            status_line(&state.view()),
            "[search] channel: live | records: 0 | last scrape failed: network error: connection refused"
        );
    }

    #[test]
    fn sparse_record_renders_with_blank_cells() {
        let (state, _) = update(
            open_state(),
            Msg::RecordReceived(ScrapeRecord::from_fields([("Company Name", "Acme")])),
        );
        let view = state.view();

        let line = format_row(&view.rows[0]);
        assert!(line.starts_with("1     | "));
        assert!(line.contains("Acme"));
        assert_eq!(line.matches('|').count(), RECORD_COLUMNS.len());
    }

    #[test]
    fn long_cells_are_elided() {
        assert_eq!(pad("abcdef", 4), "abc…");
        assert_eq!(pad("ab", 4), "ab  ");
    }

    #[test]
    fn rows_are_printed_once() {
        let mut out = Vec::new();
        {
            let mut renderer = TerminalRenderer::new(&mut out);
            let (state, _) = update(
                open_state(),
                Msg::RecordReceived(ScrapeRecord::from_fields([("Person Name", "Ada")])),
            );
            renderer.render(&state.view()).unwrap();
            let (state, _) = update(
                state,
                Msg::RecordReceived(ScrapeRecord::from_fields([("Person Name", "Bob")])),
            );
            renderer.render(&state.view()).unwrap();
        }
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("Ada").count(), 1);
        assert_eq!(text.matches("Bob").count(), 1);
        assert_eq!(text.matches(SERIAL_COLUMN).count(), 1);
        assert_eq!(text.matches("[search]").count(), 2);
    }
}
