//! Purpose: `recado` CLI entry point: argument parsing and process bootstrap.
//! Role: Binary crate root; parses args, dispatches commands, sets the exit code.
//! Invariants: Commands emit one JSON value on stdout per invocation.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::error::Error as StdError;
use std::io::{self, IsTerminal, Read};

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use recado::api::{Error, ErrorKind, Record, Service, decode, encode, to_exit_code};
use recado::text;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    init_tracing();

    let cli = match Cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                let message = clap_error_summary(&err);
                let hint = clap_error_hint(&err);
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(message)
                        .with_hint(hint),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    let pretty = cli.pretty;

    command_dispatch::dispatch_command(cli.command, pretty)
        .map_err(|err| (err, color_mode))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Debug, Parser)]
#[command(
    name = "recado",
    version,
    about = "Timestamped JSON records and everyday text cleanup",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"Every record is a JSON object with three fields: name, value, timestamp.

Mental model:
  - `encode` wraps a value in a record (timestamp generated for you)
  - `decode` unwraps record text back into its fields
  - `text` holds the string helpers (capitalize, reverse, escape, ...)
"#,
    after_help = r#"EXAMPLES
  $ recado encode --name greeting "hello"
  {"name":"greeting","value":"hello","timestamp":1712345678901}

  $ recado encode --name greeting "hello" | recado decode --pretty
  $ recado text capitalize "hello world"
  "Hello world"

LEARN MORE
  $ recado <command> --help
  https://github.com/recado-rs/recado"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,
    #[arg(long, global = true, help = "Pretty-print JSON output")]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Trim input and wrap it in a record named \"input\"",
        after_help = r#"EXAMPLES
  $ recado process "  hello world  "
  {"name":"input","value":"hello world","timestamp":1712345678901}

NOTES
  - Omitted or blank INPUT encodes an empty text value"#
    )]
    Process {
        #[arg(help = "Text to clean and wrap")]
        input: Option<String>,
    },
    #[command(about = "Describe this service (name, version, status)")]
    Info,
    #[command(
        about = "Encode a value as record JSON",
        after_help = r#"EXAMPLES
  $ recado encode --name answer --json 42
  $ recado encode --name greeting "hello"
  $ recado encode

NOTES
  - Omitted VALUE or --name encodes JSON null for that field
  - --json parses VALUE as a JSON value instead of plain text"#
    )]
    Encode {
        #[arg(long, help = "Record name (omitted encodes null)")]
        name: Option<String>,
        #[arg(help = "Value to wrap (omitted encodes null)")]
        value: Option<String>,
        #[arg(long, help = "Parse VALUE as JSON instead of plain text")]
        json: bool,
    },
    #[command(
        about = "Decode record JSON into its fields",
        after_help = r#"EXAMPLES
  $ recado decode '{"name":"a","value":1,"timestamp":5}'
  $ recado encode --name a --json 1 | recado decode --time

NOTES
  - TEXT omitted: reads stdin
  - --time requires a well-formed record (timestamp present)
  - Malformed input exits with the decode error code"#
    )]
    Decode {
        #[arg(help = "Record JSON (omitted: read stdin)")]
        text: Option<String>,
        #[arg(long, help = "Add an RFC3339 time field derived from the timestamp")]
        time: bool,
    },
    #[command(
        arg_required_else_help = true,
        about = "Text helpers",
        after_help = r#"EXAMPLES
  $ recado text capitalize "hello"
  $ recado text split --separator "," " a , b ,, c "
  $ recado text random 24

NOTES
  - Results are emitted as JSON values (strings are quoted)"#
    )]
    Text {
        #[command(subcommand)]
        command: TextCommand,
    },
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        after_help = r#"EXAMPLES
  $ recado completion bash > ~/.local/share/bash-completion/completions/recado
  $ recado completion zsh > ~/.zfunc/_recado
  $ recado completion fish > ~/.config/fish/completions/recado.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
enum TextCommand {
    #[command(about = "Uppercase the first character")]
    Capitalize {
        #[arg(help = "Input text")]
        text: String,
    },
    #[command(about = "Reverse the input character by character")]
    Reverse {
        #[arg(help = "Input text")]
        text: String,
    },
    #[command(about = "Report whether the input is blank")]
    Blank {
        #[arg(help = "Input text")]
        text: String,
    },
    #[command(about = "Generate a random alphanumeric string")]
    Random {
        #[arg(default_value_t = 16, help = "Length in characters")]
        length: usize,
    },
    #[command(about = "Escape HTML-significant characters")]
    Escape {
        #[arg(help = "Input text")]
        text: String,
    },
    #[command(about = "Replace HTML entities with their characters")]
    Unescape {
        #[arg(help = "Input text")]
        text: String,
    },
    #[command(about = "Join items with a separator")]
    Join {
        #[arg(long, default_value = ", ", help = "Separator between items")]
        separator: String,
        #[arg(help = "Items to join")]
        items: Vec<String>,
    },
    #[command(about = "Split text, trim segments, drop blank ones")]
    Split {
        #[arg(long, default_value = ",", help = "Separator to split on")]
        separator: String,
        #[arg(help = "Input text")]
        text: String,
    },
    #[command(about = "Count non-overlapping occurrences of a substring")]
    Count {
        #[arg(help = "Text to search")]
        text: String,
        #[arg(help = "Substring to count")]
        needle: String,
    },
}

fn read_stdin_text() -> Result<String, Error> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read stdin")
            .with_source(err)
    })?;
    Ok(buf)
}

fn parse_inline_json(value: &str) -> Result<Value, Error> {
    serde_json::from_str(value).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid json value")
            .with_hint("Provide a single JSON value (e.g. '{\"x\":1}') or drop --json.")
            .with_source(err)
    })
}

fn emit_message(value: Value, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    } else {
        serde_json::to_string(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

/// Prints text that is already JSON, reparsing only when pretty output asks.
fn emit_json_text(text: &str, pretty: bool) {
    if pretty {
        if let Ok(value) = serde_json::from_str::<Value>(text) {
            emit_message(value, true);
            return;
        }
    }
    println!("{text}");
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Encode => "encode failed".to_string(),
        ErrorKind::Decode => "decode failed".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(snippet) = err.snippet() {
        inner.insert("input".to_string(), json!(snippet));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(snippet) = err.snippet() {
        lines.push(format!(
            "{} {snippet}",
            colorize_label("input:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let usage = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(str::trim);

    let Some(usage) = usage else {
        return "Try `recado --help`.".to_string();
    };

    let tokens: Vec<&str> = usage.split_whitespace().collect();
    let Some(pos) = tokens.iter().position(|t| *t == "recado") else {
        return "Try `recado --help`.".to_string();
    };

    let mut parts = Vec::new();
    for token in tokens.iter().skip(pos + 1) {
        if token.starts_with('-') || token.starts_with('<') || token.starts_with('[') {
            break;
        }
        parts.push(*token);
    }

    if parts.is_empty() {
        return "Try `recado --help`.".to_string();
    }

    format!("Try `recado {} --help`.", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::{
        Cli, clap_error_hint, clap_error_summary, error_causes, error_json, error_message,
        error_text, parse_inline_json,
    };
    use clap::Parser;
    use recado::api::{Error, ErrorKind};
    use serde_json::json;

    #[test]
    fn error_text_respects_color_flag() {
        let err = Error::new(ErrorKind::Usage).with_message("bad input");
        let colored = error_text(&err, true);
        let plain = error_text(&err, false);
        assert!(colored.contains("\u{1b}[31merror:\u{1b}[0m"));
        assert!(plain.contains("error:"));
        assert!(!plain.contains("\u{1b}["));
    }

    #[test]
    fn error_json_carries_kind_message_and_input() {
        let err = Error::new(ErrorKind::Decode)
            .with_message("invalid record json")
            .with_snippet("{ nope");
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], json!("Decode"));
        assert_eq!(value["error"]["message"], json!("invalid record json"));
        assert_eq!(value["error"]["input"], json!("{ nope"));
    }

    #[test]
    fn error_message_falls_back_to_kind_defaults() {
        assert_eq!(error_message(&Error::new(ErrorKind::Decode)), "decode failed");
        assert_eq!(error_message(&Error::new(ErrorKind::Io)), "i/o error");
    }

    #[test]
    fn error_causes_walk_the_source_chain() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").expect_err("parse");
        let err = Error::new(ErrorKind::Decode).with_source(parse_err);
        let causes = error_causes(&err);
        assert_eq!(causes.len(), 1);
        assert!(causes[0].contains("EOF"), "cause: {}", causes[0]);
    }

    #[test]
    fn inline_json_rejects_bad_input_as_usage() {
        let err = parse_inline_json("{ nope").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.hint().is_some());
    }

    #[test]
    fn inline_json_accepts_scalars_and_objects() {
        assert_eq!(parse_inline_json("42").expect("parse"), json!(42));
        assert_eq!(parse_inline_json("{\"x\":1}").expect("parse"), json!({"x": 1}));
    }

    #[test]
    fn cli_types_are_debug_printable() {
        let cli = Cli::try_parse_from(["recado", "text", "reverse", "abc"]).expect("parse");
        let rendered = format!("{cli:?}");
        assert!(rendered.contains("Reverse"), "rendered: {rendered}");
    }

    #[test]
    fn missing_argument_hint_names_the_subcommand() {
        let err = Cli::try_parse_from(["recado", "text", "count", "hello"]).expect_err("err");
        let hint = clap_error_hint(&err);
        assert_eq!(hint, "Try `recado text count --help`.");
        assert!(!clap_error_summary(&err).is_empty());
    }

    #[test]
    fn unknown_flag_summary_drops_the_error_prefix() {
        let err = Cli::try_parse_from(["recado", "info", "--bogus"]).expect_err("err");
        let summary = clap_error_summary(&err);
        assert!(!summary.starts_with("error:"), "summary: {summary}");
        assert!(summary.contains("--bogus"), "summary: {summary}");
    }
}
