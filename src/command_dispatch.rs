//! Purpose: Hold top-level CLI command dispatch for `recado`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Every command emits exactly one JSON value on stdout on success.
//! Invariants: Helpers in `main.rs` remain the source of shared output logic.

use super::*;

pub(super) fn dispatch_command(command: Command, pretty: bool) -> Result<RunOutcome, Error> {
    match command {
        Command::Process { input } => {
            let service = Service::new();
            let encoded = service.process(input.as_deref())?;
            emit_json_text(&encoded, pretty);
            Ok(RunOutcome::ok())
        }
        Command::Info => {
            let service = Service::new();
            emit_json_text(&service.describe(), pretty);
            Ok(RunOutcome::ok())
        }
        Command::Encode { name, value, json } => {
            let value = match value {
                None => Value::Null,
                Some(text) if json => parse_inline_json(&text)?,
                Some(text) => Value::String(text),
            };
            let encoded = encode(name.as_deref(), value)?;
            emit_json_text(&encoded, pretty);
            Ok(RunOutcome::ok())
        }
        Command::Decode { text, time } => {
            let input = match text {
                Some(text) => text,
                None => {
                    if io::stdin().is_terminal() {
                        return Err(Error::new(ErrorKind::Usage)
                            .with_message("missing input text")
                            .with_hint("Pass record JSON as TEXT or pipe it to stdin."));
                    }
                    read_stdin_text()?
                }
            };
            let mut mapping = decode(&input)?;
            if time {
                let record = Record::from_json(&input)?;
                mapping.insert("time".to_string(), json!(record.time_rfc3339()?));
            }
            emit_message(Value::Object(mapping), pretty);
            Ok(RunOutcome::ok())
        }
        Command::Text { command } => dispatch_text_command(command, pretty),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "recado", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}

fn dispatch_text_command(command: TextCommand, pretty: bool) -> Result<RunOutcome, Error> {
    let value = match command {
        TextCommand::Capitalize { text } => json!(text::capitalize(&text)),
        TextCommand::Reverse { text } => json!(text::reverse(&text)),
        TextCommand::Blank { text } => json!(text::is_blank(&text)),
        TextCommand::Random { length } => json!(text::random_alphanumeric(length)?),
        TextCommand::Escape { text } => json!(text::escape_html(&text)),
        TextCommand::Unescape { text } => json!(text::unescape_html(&text)),
        TextCommand::Join { separator, items } => json!(text::join(&items, &separator)),
        TextCommand::Split { separator, text } => json!(text::split_and_trim(&text, &separator)),
        TextCommand::Count { text, needle } => json!(text::count_occurrences(&text, &needle)),
    };
    emit_message(value, pretty);
    Ok(RunOutcome::ok())
}
