//! Purpose: Decide overflow, resynchronize the stream, and strip the line terminator.
//! Exports: `Resolution`, `Overflow`, `resolve`, `OVERFLOW_NOTICE`.
//! Role: Second pipeline stage; turns a raw acquisition into a sentinel-terminated line.
//! Invariants: After an overflow the stream sits at the start of the next physical line.
//! Invariants: Postcondition on every path: `content()` has no terminator, `byte[len] == SENTINEL`.
//! Invariants: Resolved length never exceeds the requested budget.
use crate::core::buffer::InputBuffer;
use crate::core::error::Error;
use crate::core::source::{LineSource, TERMINATOR, io_error};
use crate::notice::{DiagnosticSink, Notice, Severity};

pub const OVERFLOW_NOTICE: &str = "overflow";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Overflow {
    /// Byte budget the line was truncated to.
    pub requested: usize,
    /// Bytes of the physical line dropped after the budget, terminator included.
    pub discarded: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Resolution {
    pub len: usize,
    pub overflow: Option<Overflow>,
}

/// Resolves `acquired` bytes that [`acquire`](crate::core::source::acquire) read for `budget`.
///
/// Overflow means all `budget + 1` slots were filled and the last one is not the terminator.
/// A short read without a terminator is the final line of a stream that ended without one and
/// resolves to what was read.
pub fn resolve<S, D>(
    source: &mut S,
    buffer: &mut InputBuffer,
    acquired: usize,
    budget: usize,
    sink: &mut D,
) -> Result<Resolution, Error>
where
    S: LineSource + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    let slots = budget + 1;
    debug_assert!(acquired <= slots, "acquired more than the fill region");

    if acquired == slots && buffer.byte_at(budget) != Some(TERMINATOR) {
        let rest = source
            .discard_line()
            .map_err(|err| io_error(err, "failed to discard overflowed input"))?;
        buffer.terminate_at(budget);
        let overflow = Overflow {
            requested: budget,
            discarded: rest + 1,
        };
        sink.emit(
            Notice::new(
                Severity::Warning,
                OVERFLOW_NOTICE,
                format!(
                    "input longer than {budget} bytes; the rest of the line was discarded"
                ),
            )
            .with_detail("requested", overflow.requested)
            .with_detail("discarded", overflow.discarded),
        );
        return Ok(Resolution {
            len: budget,
            overflow: Some(overflow),
        });
    }

    let len = match buffer.position_of(TERMINATOR, acquired) {
        Some(pos) => pos,
        None => {
            debug_assert!(acquired <= budget, "unterminated full read escaped overflow check");
            acquired.min(budget)
        }
    };
    buffer.terminate_at(len);
    Ok(Resolution {
        len,
        overflow: None,
    })
}
