// Shape validators over resolved content: policy check, single letter, strict integer.
// All checks are pure predicates over `&[u8]`; clearing caller storage is the api's job.
use std::num::IntErrorKind;

use crate::core::charset::{CharacterSetSummary, is_letter};
use crate::core::error::{Error, ErrorKind};

/// Character classes a bounded string may contain. Every flag must be stated by the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValidationPolicy {
    pub allow_space: bool,
    pub allow_digit: bool,
    pub allow_symbol: bool,
    pub allow_uppercase: bool,
    pub allow_lowercase: bool,
}

/// Checks `summary` against `policy` in fixed order: space, digit, symbol, uppercase, lowercase.
pub fn check_policy(summary: &CharacterSetSummary, policy: &ValidationPolicy) -> Result<(), Error> {
    let checks = [
        (summary.space, policy.allow_space, ErrorKind::DisallowedWhitespace),
        (summary.digit, policy.allow_digit, ErrorKind::DisallowedDigit),
        (summary.symbol, policy.allow_symbol, ErrorKind::DisallowedSymbol),
        (summary.uppercase, policy.allow_uppercase, ErrorKind::DisallowedUppercase),
        (summary.lowercase, policy.allow_lowercase, ErrorKind::DisallowedLowercase),
    ];
    for (found, allowed, kind) in checks {
        if found && !allowed {
            return Err(Error::new(kind));
        }
    }
    Ok(())
}

pub fn check_not_empty(content: &[u8]) -> Result<(), Error> {
    if content.is_empty() {
        return Err(Error::new(ErrorKind::EmptyInput));
    }
    Ok(())
}

/// Accepts exactly one ASCII letter.
pub fn check_letter(content: &[u8]) -> Result<u8, Error> {
    check_not_empty(content)?;
    match content {
        [byte] if is_letter(*byte) => Ok(*byte),
        [_] => Err(Error::new(ErrorKind::NonAlphabeticCharacter)),
        _ => Err(Error::new(ErrorKind::NonAlphabeticCharacter)
            .with_message("expected a single letter but found more than one character")),
    }
}

/// Converts the whole of `content` to a base-10 `i64`; an optional leading sign is accepted.
///
/// Whitespace anywhere is a whitespace violation, checked before conversion.
pub fn parse_integer(content: &[u8]) -> Result<i64, Error> {
    check_not_empty(content)?;
    let summary = CharacterSetSummary::scan(content);
    if summary.space {
        return Err(Error::new(ErrorKind::DisallowedWhitespace)
            .with_message("spaces are not allowed in a number"));
    }
    if !summary.digit {
        return Err(no_digits());
    }
    let text = std::str::from_utf8(content).map_err(|_| no_digits())?;
    text.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            Error::new(ErrorKind::NumericConversionFailed)
                .with_message("number is outside the supported integer range")
        }
        _ => Error::new(ErrorKind::NumericConversionFailed)
            .with_message("found characters that are not part of a number"),
    })
}

fn no_digits() -> Error {
    Error::new(ErrorKind::NumericConversionFailed)
        .with_message("unable to find valid data that can be converted into a number")
}
