//! Purpose: Lock the observable read contract against in-memory line streams.
//! Exports: Integration tests only (no runtime exports).
//! Role: Exercise the public `api::Reader` surface the way embedding programs use it.
//! Invariants: Content never exceeds the requested budget.
//! Invariants: After overflow, the next read starts at the next physical line.
//! Invariants: Empty input, exhausted streams, and overflow stay distinguishable.

use std::io::{BufRead, BufReader, Cursor};

use readtrmin::api::{
    ErrorKind, NoticeLog, OVERFLOW_NOTICE, REJECTED_NOTICE, Reader, Severity, ValidationPolicy,
};

const ALLOW_ALL: ValidationPolicy = ValidationPolicy {
    allow_space: true,
    allow_digit: true,
    allow_symbol: true,
    allow_uppercase: true,
    allow_lowercase: true,
};

const LETTERS: ValidationPolicy = ValidationPolicy {
    allow_space: false,
    allow_digit: false,
    allow_symbol: false,
    allow_uppercase: true,
    allow_lowercase: true,
};

fn reader(input: &str) -> Reader<Cursor<Vec<u8>>, NoticeLog> {
    Reader::with_sink(Cursor::new(input.as_bytes().to_vec()), NoticeLog::new())
}

#[test]
fn content_never_exceeds_budget() {
    let line = "the quick brown fox jumps over the lazy dog";
    for budget in 1..=line.len() + 2 {
        let mut reader = reader(&format!("{line}\n"));
        let value = reader
            .read_string(budget + 1, budget, &ALLOW_ALL)
            .expect("read");
        assert!(value.len() <= budget, "budget {budget} yielded {}", value.len());
        assert_eq!(value.as_bytes(), &line.as_bytes()[..budget.min(line.len())]);

        let overflowed = reader.sink().of_kind(OVERFLOW_NOTICE).count();
        assert_eq!(overflowed, usize::from(budget < line.len()), "budget {budget}");
    }
}

#[test]
fn overflow_resynchronizes_on_next_line() {
    let mut reader = reader("hello\nworld\n");
    assert_eq!(
        reader.read_string(4, 3, &LETTERS).expect("first").as_bytes(),
        b"hel"
    );
    assert_eq!(
        reader.read_string(8, 7, &LETTERS).expect("second").as_bytes(),
        b"world"
    );

    let (mut source, log) = reader.into_parts();
    let mut rest = String::new();
    assert_eq!(source.read_line(&mut rest).expect("read"), 0);

    let warnings: Vec<_> = log.of_kind(OVERFLOW_NOTICE).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert_eq!(warnings[0].details["requested"], 3);
    assert_eq!(warnings[0].details["discarded"], 3);
}

#[test]
fn overflow_resync_spans_small_stream_buffers() {
    let long_line = "x".repeat(5000);
    let input = format!("{long_line}\nok\n");
    let source = BufReader::with_capacity(16, Cursor::new(input.into_bytes()));
    let mut reader = Reader::with_sink(source, NoticeLog::new());

    let first = reader.read_string(9, 8, &LETTERS).expect("first");
    assert_eq!(first.len(), 8);
    let second = reader.read_string(9, 8, &LETTERS).expect("second");
    assert_eq!(second.as_bytes(), b"ok");
}

#[test]
fn empty_input_only_for_bare_terminator() {
    let mut r = reader("\n");
    assert_eq!(
        r.read_string(4, 3, &ALLOW_ALL).unwrap_err().kind(),
        ErrorKind::EmptyInput
    );
    assert_eq!(
        r.read_string(4, 3, &ALLOW_ALL).unwrap_err().kind(),
        ErrorKind::StreamExhausted
    );

    let mut reader = reader(" \n");
    assert_eq!(
        reader.read_string(4, 3, &ALLOW_ALL).expect("blank is content").as_bytes(),
        b" "
    );
}

#[test]
fn whitespace_wins_over_digit() {
    let mut reader = reader("a 1\n");
    let err = reader.read_string(8, 7, &LETTERS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisallowedWhitespace);

    let rejected = reader.sink().of_kind(REJECTED_NOTICE).next().expect("notice");
    assert_eq!(rejected.severity, Severity::Error);
}

#[test]
fn letter_round_trip_is_exact() {
    for word in ["a", "Zed", "MixedCase", "abcdefghijklmnop"] {
        let mut reader = reader(&format!("{word}\n"));
        let value = reader.read_string(32, word.len(), &LETTERS).expect("read");
        assert_eq!(value.to_str().expect("utf8"), word);
        assert_eq!(value.len(), word.len());
    }
}

#[test]
fn integer_examples() {
    let mut reader = reader("42\n4a\n\n");
    assert_eq!(reader.read_integer(2).expect("42"), 42);
    assert_eq!(
        reader.read_integer(9).unwrap_err().kind(),
        ErrorKind::NumericConversionFailed
    );
    assert_eq!(reader.read_integer(9).unwrap_err().kind(), ErrorKind::EmptyInput);
}

#[test]
fn single_character_examples() {
    let mut reader = reader("Q\n5\n\n");
    assert_eq!(reader.read_char().expect("Q"), 'Q');
    assert_eq!(
        reader.read_char().unwrap_err().kind(),
        ErrorKind::NonAlphabeticCharacter
    );
    assert_eq!(reader.read_char().unwrap_err().kind(), ErrorKind::EmptyInput);
}

#[test]
fn rejected_read_does_not_consume_following_lines() {
    let mut reader = reader("bad!\ngood\n");
    assert_eq!(
        reader.read_string(8, 7, &LETTERS).unwrap_err().kind(),
        ErrorKind::DisallowedSymbol
    );
    assert_eq!(
        reader.read_string(8, 7, &LETTERS).expect("next line").as_bytes(),
        b"good"
    );
}

#[test]
fn final_line_without_terminator_is_accepted() {
    let mut reader = reader("last");
    assert_eq!(
        reader.read_string(8, 7, &LETTERS).expect("read").as_bytes(),
        b"last"
    );
    assert!(reader.sink().of_kind(OVERFLOW_NOTICE).next().is_none());
}

#[test]
fn caller_storage_is_cleared_on_rejection() {
    let mut reader = reader("UPPER\n");
    let policy = ValidationPolicy {
        allow_uppercase: false,
        ..LETTERS
    };
    let mut dest = *b"stale!!!";
    let err = reader.read_string_into(&mut dest, 7, &policy).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisallowedUppercase);
    assert_eq!(dest, [0u8; 8]);
}
