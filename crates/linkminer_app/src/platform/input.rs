use linkminer_core::Msg;

/// What one line typed at the prompt means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputLine {
    Submit(String),
    Cancel,
    Quit,
}

pub(crate) fn parse_line(line: &str) -> InputLine {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.trim() {
        ":cancel" | ":c" => InputLine::Cancel,
        ":quit" | ":q" => InputLine::Quit,
        _ => InputLine::Submit(line.to_string()),
    }
}

/// The prompt is the input field: typing a line edits it, Enter submits it.
pub(crate) fn to_msgs(input: InputLine) -> Vec<Msg> {
    match input {
        InputLine::Submit(text) => vec![Msg::InputChanged(text), Msg::SubmitClicked],
        InputLine::Cancel => vec![Msg::CancelClicked],
        InputLine::Quit => vec![Msg::QuitRequested],
    }
}
