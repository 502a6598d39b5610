//! Purpose: Define the closed error model shared by every read operation.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Typed failure channel threaded through acquisition, resolution, and validation.
//! Invariants: Rejection kinds are never coerced into one another.
//! Invariants: Buffer overflow is a notice, never an `ErrorKind`.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    StreamExhausted,
    EmptyInput,
    DisallowedWhitespace,
    DisallowedDigit,
    DisallowedSymbol,
    DisallowedUppercase,
    DisallowedLowercase,
    NonAlphabeticCharacter,
    NumericConversionFailed,
    Io,
    Usage,
}

impl ErrorKind {
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::StreamExhausted => "expected some input but the stream is closed",
            ErrorKind::EmptyInput => "expected some input but found nothing",
            ErrorKind::DisallowedWhitespace => "spaces are not allowed",
            ErrorKind::DisallowedDigit => "numbers are not allowed",
            ErrorKind::DisallowedSymbol => "special characters are not allowed",
            ErrorKind::DisallowedUppercase => "uppercase letters are not allowed",
            ErrorKind::DisallowedLowercase => "lowercase letters are not allowed",
            ErrorKind::NonAlphabeticCharacter => "only alphabet letters are allowed",
            ErrorKind::NumericConversionFailed => "unable to convert the input into a number",
            ErrorKind::Io => "i/o error",
            ErrorKind::Usage => "usage error",
        }
    }

    /// True for failures caused by the line's content rather than the stream or the caller.
    pub fn is_rejection(self) -> bool {
        !matches!(
            self,
            ErrorKind::StreamExhausted | ErrorKind::Io | ErrorKind::Usage
        )
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Message to show a user: the attached message, else the kind's default.
    pub fn reason(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.reason())?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Usage => 2,
        ErrorKind::Io => 3,
        ErrorKind::StreamExhausted => 4,
        ErrorKind::EmptyInput => 10,
        ErrorKind::DisallowedWhitespace => 11,
        ErrorKind::DisallowedDigit => 12,
        ErrorKind::DisallowedSymbol => 13,
        ErrorKind::DisallowedUppercase => 14,
        ErrorKind::DisallowedLowercase => 15,
        ErrorKind::NonAlphabeticCharacter => 16,
        ErrorKind::NumericConversionFailed => 17,
    }
}
