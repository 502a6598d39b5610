//! Purpose: Define the public Rust API boundary for typed console reads.
//! Exports: `Reader`, `BoundedString`, stdin helpers, and the core types callers need.
//! Role: Public, additive-only surface over the acquisition/resolution/validation pipeline.
//! Invariants: Callers receive typed failures; nothing here exits the process.
//! Invariants: Rejected reads are never retried here; retry loops belong to the caller.

mod console;
mod reader;

pub use crate::core::charset::CharacterSetSummary;
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::resolve::{OVERFLOW_NOTICE, Overflow};
pub use crate::core::source::LineSource;
pub use crate::core::validate::ValidationPolicy;
pub use crate::notice::{DiagnosticSink, Notice, NoticeLog, Severity, TracingSink, notice_json};
pub use console::{read_bounded_integer, read_bounded_string, read_single_character};
pub use reader::{
    ACCEPTED_NOTICE, BoundedString, INTEGER_BUFFER_CAPACITY, REJECTED_NOTICE, Reader,
};
