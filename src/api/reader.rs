use std::fmt;

use bstr::{BStr, ByteSlice};

use crate::core::buffer::{InputBuffer, SENTINEL};
use crate::core::charset::CharacterSetSummary;
use crate::core::error::Error;
use crate::core::resolve::{Resolution, resolve};
use crate::core::source::{LineSource, acquire};
use crate::core::validate::{self, ValidationPolicy};
use crate::notice::{DiagnosticSink, Notice, Severity, TracingSink};

/// Buffer used by integer reads; the largest digit budget is one less.
pub const INTEGER_BUFFER_CAPACITY: usize = 21;

const CHAR_BUFFER_CAPACITY: usize = 2;

pub const REJECTED_NOTICE: &str = "rejected";
pub const ACCEPTED_NOTICE: &str = "accepted";

/// Content of a successful bounded-string read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoundedString {
    content: Vec<u8>,
    capacity: usize,
}

impl BoundedString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn as_bstr(&self) -> &BStr {
        self.content.as_bstr()
    }

    pub fn to_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.content)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Capacity of the buffer the string was read into.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.content
    }
}

impl fmt::Display for BoundedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_bstr(), f)
    }
}

/// Reads typed values line by line from a [`LineSource`], reporting to a [`DiagnosticSink`].
///
/// Every read owns a fresh buffer for its duration. A rejected read never retries; the next call
/// starts at the next physical line.
#[derive(Debug)]
pub struct Reader<S, D = TracingSink> {
    source: S,
    sink: D,
}

impl<S: LineSource> Reader<S, TracingSink> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            sink: TracingSink,
        }
    }
}

impl<S: LineSource, D: DiagnosticSink> Reader<S, D> {
    pub fn with_sink(source: S, sink: D) -> Self {
        Self { source, sink }
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    pub fn into_parts(self) -> (S, D) {
        (self.source, self.sink)
    }

    /// Reads one ASCII letter.
    ///
    /// # Errors
    ///
    /// `StreamExhausted`, `Io`, `EmptyInput`, or `NonAlphabeticCharacter`.
    pub fn read_char(&mut self) -> Result<char, Error> {
        let mut buffer = InputBuffer::new(CHAR_BUFFER_CAPACITY);
        let outcome = self.read_line(&mut buffer, 1).and_then(|_| {
            let byte = validate::check_letter(buffer.content())?;
            debug_assert_eq!(buffer.byte_at(1), Some(SENTINEL));
            Ok(char::from(byte))
        });
        self.report("char", outcome.as_ref().map(|_| 1));
        outcome
    }

    /// Reads at most `max_input_len` bytes into a buffer of `buffer_capacity` and validates them.
    ///
    /// # Errors
    ///
    /// `StreamExhausted`, `Io`, `EmptyInput`, or the first policy violation in check order.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < max_input_len < buffer_capacity`.
    pub fn read_string(
        &mut self,
        buffer_capacity: usize,
        max_input_len: usize,
        policy: &ValidationPolicy,
    ) -> Result<BoundedString, Error> {
        check_string_limits(buffer_capacity, max_input_len);
        let mut buffer = InputBuffer::new(buffer_capacity);
        let outcome = self
            .read_validated_string(&mut buffer, max_input_len, policy)
            .map(|()| BoundedString {
                content: buffer.content().to_vec(),
                capacity: buffer_capacity,
            });
        self.report("string", outcome.as_ref().map(BoundedString::len));
        outcome
    }

    /// Like [`read_string`](Self::read_string) but writes into caller storage.
    ///
    /// `dest.len()` is the buffer capacity. On success `dest[..len]` holds the content and
    /// `dest[len]` is zero. On failure `dest` is entirely zeroed.
    ///
    /// # Errors
    ///
    /// Same as [`read_string`](Self::read_string).
    ///
    /// # Panics
    ///
    /// Panics unless `0 < max_input_len < dest.len()`.
    pub fn read_string_into(
        &mut self,
        dest: &mut [u8],
        max_input_len: usize,
        policy: &ValidationPolicy,
    ) -> Result<usize, Error> {
        check_string_limits(dest.len(), max_input_len);
        dest.fill(SENTINEL);
        let mut buffer = InputBuffer::new(dest.len());
        let outcome = self
            .read_validated_string(&mut buffer, max_input_len, policy)
            .map(|()| {
                let content = buffer.content();
                dest[..content.len()].copy_from_slice(content);
                content.len()
            });
        if outcome.is_err() {
            dest.fill(SENTINEL);
        }
        self.report("string", outcome.as_ref().copied());
        outcome
    }

    /// Reads a base-10 integer of at most `max_digit_budget` bytes, sign included.
    ///
    /// # Errors
    ///
    /// `StreamExhausted`, `Io`, `EmptyInput`, `DisallowedWhitespace`, or
    /// `NumericConversionFailed`.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < max_digit_budget < INTEGER_BUFFER_CAPACITY`.
    pub fn read_integer(&mut self, max_digit_budget: usize) -> Result<i64, Error> {
        assert!(
            max_digit_budget > 0 && max_digit_budget < INTEGER_BUFFER_CAPACITY,
            "max_digit_budget must be in 1..{INTEGER_BUFFER_CAPACITY}, got {max_digit_budget}"
        );
        let mut buffer = InputBuffer::new(INTEGER_BUFFER_CAPACITY);
        let outcome = self
            .read_line(&mut buffer, max_digit_budget)
            .and_then(|_| validate::parse_integer(buffer.content()));
        self.report("integer", outcome.as_ref().map(|_| buffer.len()));
        outcome
    }

    fn read_line(&mut self, buffer: &mut InputBuffer, budget: usize) -> Result<Resolution, Error> {
        let acquired = acquire(&mut self.source, buffer, budget)?;
        resolve(&mut self.source, buffer, acquired, budget, &mut self.sink)
    }

    fn read_validated_string(
        &mut self,
        buffer: &mut InputBuffer,
        max_input_len: usize,
        policy: &ValidationPolicy,
    ) -> Result<(), Error> {
        self.read_line(buffer, max_input_len)?;
        validate::check_not_empty(buffer.content())?;
        let summary = CharacterSetSummary::scan(buffer.content());
        validate::check_policy(&summary, policy)
    }

    fn report(&mut self, shape: &str, outcome: Result<usize, &Error>) {
        match outcome {
            Ok(len) => self.sink.emit(
                Notice::new(Severity::Info, ACCEPTED_NOTICE, format!("{shape} input accepted"))
                    .with_detail("shape", shape)
                    .with_detail("len", len),
            ),
            Err(err) if err.kind().is_rejection() => self.sink.emit(
                Notice::new(Severity::Error, REJECTED_NOTICE, err.reason())
                    .with_detail("shape", shape)
                    .with_detail("kind", format!("{:?}", err.kind())),
            ),
            Err(_) => {}
        }
    }
}

fn check_string_limits(buffer_capacity: usize, max_input_len: usize) {
    assert!(
        max_input_len > 0 && max_input_len < buffer_capacity,
        "max_input_len must be in 1..{buffer_capacity}, got {max_input_len}"
    );
}
