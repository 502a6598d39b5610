//! Purpose: Stdin-bound entry points for programs that just want a value from the console.
//! Exports: `read_single_character`, `read_bounded_string`, `read_bounded_integer`.
//! Role: Thin wrappers pairing a locked stdin with `TracingSink`.
//! Invariants: Each call locks stdin only for its own duration.
//! Invariants: The process-wide stdin buffer keeps line alignment across calls.
use std::io;

use crate::api::reader::{BoundedString, Reader};
use crate::core::error::Error;
use crate::core::validate::ValidationPolicy;

/// Reads one ASCII letter from stdin.
///
/// # Errors
///
/// See [`Reader::read_char`].
pub fn read_single_character() -> Result<char, Error> {
    Reader::new(io::stdin().lock()).read_char()
}

/// Reads a policy-checked string of at most `max_input_len` bytes from stdin.
///
/// # Errors
///
/// See [`Reader::read_string`].
///
/// # Panics
///
/// Panics unless `0 < max_input_len < buffer_capacity`.
pub fn read_bounded_string(
    buffer_capacity: usize,
    max_input_len: usize,
    policy: &ValidationPolicy,
) -> Result<BoundedString, Error> {
    Reader::new(io::stdin().lock()).read_string(buffer_capacity, max_input_len, policy)
}

/// Reads a base-10 integer of at most `max_digit_budget` bytes from stdin.
///
/// # Errors
///
/// See [`Reader::read_integer`].
///
/// # Panics
///
/// Panics unless `0 < max_digit_budget < INTEGER_BUFFER_CAPACITY`.
pub fn read_bounded_integer(max_digit_budget: usize) -> Result<i64, Error> {
    Reader::new(io::stdin().lock()).read_integer(max_digit_budget)
}
