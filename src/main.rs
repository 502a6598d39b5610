//! Purpose: `readtrmin` CLI entry point: read one typed value from a line stream.
//! Role: Binary crate root; parses args, wires stdin/file input to `api::Reader`, emits JSON on stdout.
//! Invariants: Successful reads emit exactly one JSON line on stdout.
//! Invariants: Non-interactive errors and notices are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde::Serialize;
use serde_json::{Map, Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use readtrmin::api::{
    DiagnosticSink, Error, ErrorKind, INTEGER_BUFFER_CAPACITY, Notice, Reader, Severity,
    notice_json, to_exit_code,
};

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
    init_tracing();
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
    let cli = match Cli::try_parse() {
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
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `readtrmin --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    command_dispatch::dispatch_command(cli.command, cli.input, color_mode)
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

#[derive(Parser)]
#[command(
    name = "readtrmin",
    version,
    about = "Read one bounded, validated value from a line stream",
    long_about = None,
    after_help = r#"EXAMPLES
  $ readtrmin char --prompt 'initial: '
  $ readtrmin string --max-len 16 --allow-upper --allow-lower
  $ readtrmin int --max-digits 4 --attempts 3
  $ printf 'hello\n' | readtrmin string --max-len 3 --allow-lower   # overflow: prints "hel"

NOTES
  - Lines longer than the budget are truncated; the rest of the line is discarded
  - Results are one JSON line on stdout; diagnostics go to stderr
  - RUST_LOG controls diagnostic verbosity (default: warn)"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Read from a file instead of stdin (use - for stdin)",
        value_hint = ValueHint::FilePath
    )]
    input: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

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

#[derive(clap::Args, Clone, Debug)]
struct PromptArgs {
    #[arg(long, help = "Text written to stderr before each attempt")]
    prompt: Option<String>,
    #[arg(
        long,
        default_value_t = 1,
        help = "Read attempts before giving up on rejected input"
    )]
    attempts: u32,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Read a single ASCII letter")]
    Char {
        #[command(flatten)]
        prompt: PromptArgs,
    },
    #[command(
        about = "Read a bounded string checked against allowed character classes",
        after_help = r#"EXAMPLES
  $ readtrmin string --max-len 8 --allow-lower                 # one lowercase word
  $ readtrmin string --max-len 32 --allow-space --allow-upper --allow-lower

NOTES
  - Every class is denied unless its --allow-* flag is given
  - Violations are reported in order: space, digit, symbol, uppercase, lowercase"#
    )]
    String {
        #[arg(long, help = "Maximum content bytes to accept")]
        max_len: usize,
        #[arg(long, help = "Buffer capacity in bytes (default: max-len + 1)")]
        capacity: Option<usize>,
        #[arg(long, help = "Allow spaces and tabs")]
        allow_space: bool,
        #[arg(long, help = "Allow ASCII digits")]
        allow_digit: bool,
        #[arg(long, help = "Allow symbols (anything not a letter, digit, or blank)")]
        allow_symbol: bool,
        #[arg(long, help = "Allow uppercase ASCII letters")]
        allow_upper: bool,
        #[arg(long, help = "Allow lowercase ASCII letters")]
        allow_lower: bool,
        #[command(flatten)]
        prompt: PromptArgs,
    },
    #[command(about = "Read a base-10 integer")]
    Int {
        #[arg(
            long,
            default_value_t = 9,
            help = "Maximum bytes of input, sign included"
        )]
        max_digits: usize,
        #[command(flatten)]
        prompt: PromptArgs,
    },
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Serialize)]
struct ReadOutput<'a> {
    shape: &'a str,
    value: Value,
    len: usize,
}

fn open_input(path: Option<PathBuf>) -> Result<Box<dyn BufRead>, Error> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(&path).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message(format!("failed to open {}", path.display()))
                    .with_hint("Check the --input path or pipe the input on stdin.")
                    .with_source(err)
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Renders overflow warnings for the user; everything else goes to `tracing` at debug level.
struct CliSink {
    color_mode: ColorMode,
}

impl DiagnosticSink for CliSink {
    fn emit(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Warning => emit_notice(&notice, self.color_mode),
            Severity::Info | Severity::Error => {
                tracing::debug!(kind = %notice.kind, "{}", notice.message);
            }
        }
    }
}

fn new_reader(
    input: Option<PathBuf>,
    color_mode: ColorMode,
) -> Result<Reader<Box<dyn BufRead>, CliSink>, Error> {
    Ok(Reader::with_sink(open_input(input)?, CliSink { color_mode }))
}

/// Runs `read` until it succeeds, fails for a non-content reason, or attempts run out.
fn read_with_attempts<T>(
    prompt: &PromptArgs,
    color_mode: ColorMode,
    mut read: impl FnMut() -> Result<T, Error>,
) -> Result<T, Error> {
    if prompt.attempts == 0 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("--attempts must be at least 1"));
    }
    let mut attempt = 1u32;
    loop {
        if let Some(text) = &prompt.prompt {
            let mut stderr = io::stderr();
            let _ = write!(stderr, "{text}");
            let _ = stderr.flush();
        }
        match read() {
            Ok(value) => return Ok(value),
            Err(err) if err.kind().is_rejection() && attempt < prompt.attempts => {
                let notice = Notice::new(Severity::Error, "rejected", err.reason())
                    .with_detail("kind", format!("{:?}", err.kind()))
                    .with_detail("attempt", attempt)
                    .with_detail("attempts", prompt.attempts);
                emit_notice(&notice, color_mode);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn emit_output(output: &ReadOutput<'_>) {
    let json = serde_json::to_string(output)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

#[derive(Copy, Clone)]
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

fn notice_time_now() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}

fn emit_notice(notice: &Notice, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        let (label, color) = match notice.severity {
            Severity::Error => ("error:", AnsiColor::Red),
            Severity::Warning => ("warning:", AnsiColor::Yellow),
            Severity::Info => ("notice:", AnsiColor::Yellow),
        };
        let label = colorize_label(label, color_mode.use_color(is_tty), color);
        eprintln!("{label} {}", notice.message);
        return;
    }

    let mut stamped = notice.clone();
    if let Some(time) = notice_time_now() {
        stamped = stamped.with_time(time);
    }
    let value = notice_json(&stamped);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
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

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = std::error::Error::source(err);
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(err.reason()));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
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
    let mut lines = vec![format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        err.reason()
    )];
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(cause) = error_causes(err).first() {
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

#[cfg(test)]
mod tests {
    use super::{Cli, Command, error_json, error_text};
    use clap::{CommandFactory, Parser};
    use readtrmin::api::{Error, ErrorKind};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn string_flags_parse() {
        let cli = Cli::try_parse_from([
            "readtrmin",
            "string",
            "--max-len",
            "8",
            "--allow-lower",
            "--attempts",
            "3",
        ])
        .expect("parse");
        match cli.command {
            Command::String {
                max_len,
                capacity,
                allow_lower,
                allow_upper,
                prompt,
                ..
            } => {
                assert_eq!(max_len, 8);
                assert_eq!(capacity, None);
                assert!(allow_lower);
                assert!(!allow_upper);
                assert_eq!(prompt.attempts, 3);
            }
            _ => panic!("expected string command"),
        }
    }

    #[test]
    fn error_json_carries_kind_and_hint() {
        let err = Error::new(ErrorKind::Usage)
            .with_message("bad")
            .with_hint("fix it");
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "Usage");
        assert_eq!(value["error"]["message"], "bad");
        assert_eq!(value["error"]["hint"], "fix it");
    }

    #[test]
    fn error_text_without_color_is_plain() {
        let err = Error::new(ErrorKind::EmptyInput);
        assert_eq!(
            error_text(&err, false),
            "error: expected some input but found nothing"
        );
    }

    #[test]
    fn int_defaults_to_nine_digits() {
        let cli = Cli::try_parse_from(["readtrmin", "int"]).expect("parse");
        assert!(matches!(cli.command, Command::Int { max_digits: 9, .. }));
    }
}
