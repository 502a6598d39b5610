//! Purpose: Classify resolved line content into character sets in a single pass.
//! Exports: `CharacterSetSummary`, `is_blank`, `is_digit`, `is_upper`, `is_lower`, `is_letter`, `is_symbol`.
//! Role: Pure classification feeding the shape validators; never mutates input.
//! Invariants: ASCII-only classification; every non-ASCII byte is a symbol.
//! Invariants: Each byte lands in exactly one of blank / digit / upper / lower / symbol.

/// Recognized whitespace: space and horizontal tab. Other control bytes are symbols.
pub fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}

pub fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

pub fn is_upper(byte: u8) -> bool {
    byte.is_ascii_uppercase()
}

pub fn is_lower(byte: u8) -> bool {
    byte.is_ascii_lowercase()
}

pub fn is_letter(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

/// Residual class: anything that is not a digit, letter, or recognized whitespace.
pub fn is_symbol(byte: u8) -> bool {
    !is_digit(byte) && !is_letter(byte) && !is_blank(byte)
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CharacterSetSummary {
    pub space: bool,
    pub digit: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub symbol: bool,
}

impl CharacterSetSummary {
    pub fn scan(content: &[u8]) -> Self {
        let mut summary = Self::default();
        for &byte in content {
            if is_blank(byte) {
                summary.space = true;
            } else if is_digit(byte) {
                summary.digit = true;
            } else if is_upper(byte) {
                summary.uppercase = true;
            } else if is_lower(byte) {
                summary.lowercase = true;
            } else {
                summary.symbol = true;
            }
        }
        summary
    }

    pub fn letter(&self) -> bool {
        self.uppercase || self.lowercase
    }
}
