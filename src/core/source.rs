//! Purpose: Acquire at most one bounded line from a line-oriented byte stream.
//! Exports: `LineSource`, `acquire`, `TERMINATOR`.
//! Role: First pipeline stage; the only stage that blocks on the stream.
//! Invariants: Never reads past the first terminator of the current physical line.
//! Invariants: Zero bytes obtained is the only failure (`StreamExhausted`) besides stream I/O errors.
use std::io::{self, BufRead};

use crate::core::buffer::InputBuffer;
use crate::core::error::{Error, ErrorKind};

pub const TERMINATOR: u8 = b'\n';

/// A stream that can hand out bounded line prefixes and skip line remainders.
pub trait LineSource {
    /// Reads up to `dst.len()` bytes, stopping right after the first terminator.
    /// Returns the number of bytes written; `0` means end-of-stream.
    fn read_bounded(&mut self, dst: &mut [u8]) -> io::Result<usize>;

    /// Consumes the rest of the current physical line, terminator included.
    /// Returns the number of bytes discarded.
    fn discard_line(&mut self) -> io::Result<usize>;
}

impl<R: BufRead + ?Sized> LineSource for R {
    fn read_bounded(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0usize;
        while filled < dst.len() {
            let available = match self.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                break;
            }
            let take = available.len().min(dst.len() - filled);
            let (take, found) = match available[..take].iter().position(|b| *b == TERMINATOR) {
                Some(pos) => (pos + 1, true),
                None => (take, false),
            };
            dst[filled..filled + take].copy_from_slice(&available[..take]);
            self.consume(take);
            filled += take;
            if found {
                break;
            }
        }
        Ok(filled)
    }

    fn discard_line(&mut self) -> io::Result<usize> {
        let mut discarded = 0usize;
        loop {
            let available = match self.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                return Ok(discarded);
            }
            match available.iter().position(|b| *b == TERMINATOR) {
                Some(pos) => {
                    self.consume(pos + 1);
                    return Ok(discarded + pos + 1);
                }
                None => {
                    let len = available.len();
                    self.consume(len);
                    discarded += len;
                }
            }
        }
    }
}

pub(crate) fn io_error(err: io::Error, message: &str) -> Error {
    Error::new(ErrorKind::Io)
        .with_message(message)
        .with_source(err)
}

/// Resets `buffer` and reads up to `budget + 1` bytes into it.
///
/// The extra slot holds either the terminator of a line that fits or the first byte past the
/// budget, which is how overflow is detected afterwards.
pub fn acquire<S: LineSource + ?Sized>(
    source: &mut S,
    buffer: &mut InputBuffer,
    budget: usize,
) -> Result<usize, Error> {
    buffer.reset();
    let read = source
        .read_bounded(buffer.fill_region(budget))
        .map_err(|err| io_error(err, "failed to read input"))?;
    if read == 0 {
        return Err(Error::new(ErrorKind::StreamExhausted));
    }
    Ok(read)
}
