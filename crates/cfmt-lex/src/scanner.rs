//! Raw byte-level reader with state save/restore, tracking line/column.
//!
//! C source is scanned byte-for-byte, not code-point-for-code-point: a
//! lexeme's offset/length must match what a downstream `expect` diagnostic
//! reports, and escapes like `\\` inside a string literal are easiest to
//! reason about as raw bytes. This generalizes the corpus's UTF-8-aware
//! [`crate::cursor`]-style char cursor down to the byte-oriented stepping
//! the original scanner performs. Backtracking goes through
//! [`Scanner::restore`] rather than a one-byte `ungetc`: every backtrack
//! site here already holds a saved [`ScannerState`] for a peek, so
//! restoring the whole tuple is no more expensive than stepping back one
//! byte and covers multi-byte backtracks too.

use crate::buffer::Buffer;

/// Snapshot of scanner position, trivially `Copy` so peek save/restore is
/// a plain assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScannerState {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
    /// Number of classification errors latched so far. Part of the
    /// snapshot so restoring a scanner state after a peek also restores
    /// whether an error had been latched at that point.
    pub err_count: u32,
}

impl ScannerState {
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
            err_count: 0,
        }
    }
}

/// Character-level reader over a [`Buffer`]'s bytes.
///
/// `getc` tolerates one extra call past end-of-input (returning the EOF
/// sentinel again) so lookahead code in the classifier never needs a
/// special case for "exactly at EOF" versus "one past EOF".
pub struct Scanner<'a> {
    bytes: &'a [u8],
    state: ScannerState,
}

/// Sentinel returned by [`Scanner::getc`] on exhaustion.
pub const EOF_BYTE: i16 = -1;

impl<'a> Scanner<'a> {
    pub fn new(buffer: &'a Buffer) -> Self {
        Self {
            bytes: buffer.as_bytes(),
            state: ScannerState::start(),
        }
    }

    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn restore(&mut self, state: ScannerState) {
        self.state = state;
    }

    pub fn offset(&self) -> usize {
        self.state.offset
    }

    pub fn line(&self) -> u32 {
        self.state.line
    }

    pub fn column(&self) -> u32 {
        self.state.column
    }

    pub fn is_at_end(&self) -> bool {
        self.state.offset >= self.bytes.len()
    }

    /// Increment the latched error counter. A no-op after the first call
    /// at a given scanner state is the caller's responsibility (the
    /// classifier only calls this once per real failure); see §7.
    pub fn note_error(&mut self) {
        self.state.err_count = self.state.err_count.saturating_add(1);
    }

    pub fn error_count(&self) -> u32 {
        self.state.err_count
    }

    /// Read and consume the next byte, or [`EOF_BYTE`] past the end.
    pub fn getc(&mut self) -> i16 {
        if self.state.offset >= self.bytes.len() {
            return EOF_BYTE;
        }
        let b = self.bytes[self.state.offset];
        self.state.offset += 1;
        if b == b'\n' {
            self.state.line += 1;
            self.state.column = 1;
        } else {
            self.state.column += 1;
        }
        b as i16
    }

    /// Peek `n` bytes ahead without consuming, or `None` past the end.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.state.offset + n).copied()
    }

    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Resolve a `(offset, len)` lexeme back into the underlying bytes,
    /// for classifiers that need to inspect what they just scanned (e.g.
    /// the keyword table's exact-match lookup after an identifier word).
    pub fn slice(&self, offset: usize, len: usize) -> &'a [u8] {
        let end = offset.saturating_add(len);
        if offset >= self.bytes.len() || end > self.bytes.len() {
            return &[];
        }
        &self.bytes[offset..end]
    }
}
