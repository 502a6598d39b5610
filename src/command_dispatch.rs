//! Purpose: Hold top-level CLI command dispatch for `readtrmin`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate read execution.
//! Invariants: Argument problems surface as `Usage` errors before any input is consumed.
//! Invariants: Library preconditions are checked here, so the library never panics on CLI input.

use super::*;

use readtrmin::api::ValidationPolicy;

const MAX_STRING_CAPACITY: usize = 1 << 20;

pub(super) fn dispatch_command(
    command: Command,
    input: Option<PathBuf>,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "readtrmin", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Char { prompt } => {
            let mut reader = new_reader(input, color_mode)?;
            let value = read_with_attempts(&prompt, color_mode, || reader.read_char())?;
            emit_output(&ReadOutput {
                shape: "char",
                value: json!(value.to_string()),
                len: 1,
            });
            Ok(RunOutcome::ok())
        }
        Command::String {
            max_len,
            capacity,
            allow_space,
            allow_digit,
            allow_symbol,
            allow_upper,
            allow_lower,
            prompt,
        } => {
            let capacity = capacity.unwrap_or(max_len.saturating_add(1));
            check_string_args(capacity, max_len)?;
            let policy = ValidationPolicy {
                allow_space,
                allow_digit,
                allow_symbol,
                allow_uppercase: allow_upper,
                allow_lowercase: allow_lower,
            };
            let mut reader = new_reader(input, color_mode)?;
            let value = read_with_attempts(&prompt, color_mode, || {
                reader.read_string(capacity, max_len, &policy)
            })?;
            emit_output(&ReadOutput {
                shape: "string",
                value: json!(value.as_bstr().to_string()),
                len: value.len(),
            });
            Ok(RunOutcome::ok())
        }
        Command::Int { max_digits, prompt } => {
            check_int_args(max_digits)?;
            let mut reader = new_reader(input, color_mode)?;
            let value = read_with_attempts(&prompt, color_mode, || reader.read_integer(max_digits))?;
            emit_output(&ReadOutput {
                shape: "int",
                value: json!(value),
                len: value.to_string().len(),
            });
            Ok(RunOutcome::ok())
        }
    }
}

fn check_string_args(capacity: usize, max_len: usize) -> Result<(), Error> {
    if max_len == 0 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("--max-len must be at least 1"));
    }
    if capacity > MAX_STRING_CAPACITY {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!("buffer capacity {capacity} exceeds {MAX_STRING_CAPACITY} bytes")));
    }
    if max_len >= capacity {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!(
                "--max-len {max_len} does not fit a buffer of capacity {capacity}"
            ))
            .with_hint("Use a --capacity larger than --max-len, or omit --capacity."));
    }
    Ok(())
}

fn check_int_args(max_digits: usize) -> Result<(), Error> {
    if max_digits == 0 || max_digits >= INTEGER_BUFFER_CAPACITY {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!(
                "--max-digits must be between 1 and {}",
                INTEGER_BUFFER_CAPACITY - 1
            ))
            .with_hint("20 bytes covers every 64-bit integer, sign included."));
    }
    Ok(())
}
