//! Lexer-internal error type and the `expect`-mismatch diagnostic format.
//!
//! Three kinds of failure are modeled (see spec §7): I/O/allocation failure
//! never reaches this crate (it is the driver's concern, outside the
//! core); a lexical error latches the cursor's error flag once and
//! replaces the token for that call with `ERROR`; a parser mismatch raised
//! through [`crate::cursor::Cursor::expect`] writes one diagnostic line and
//! latches the flag. Peek frames never latch or print either kind.

use thiserror::Error;

use crate::token::TokenKind;

/// Programmatic error classification for anything that needs to match on
/// *why* tokenization or cursor consumption failed (tests, the recovery
/// machinery), distinct from the single textual diagnostic line a mismatch
/// also produces as a side effect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character at {line}:{column}")]
    UnexpectedChar { line: u32, column: u32 },

    #[error("unterminated string or character literal at {line}:{column}")]
    UnterminatedLiteral { line: u32, column: u32 },

    #[error("expected {expected:?}, got {got:?} at {line}:{column}")]
    ExpectMismatch {
        expected: TokenKind,
        got: TokenKind,
        line: u32,
        column: u32,
    },

    #[error("cursor halted on a pending #if/#else/#endif branch")]
    BranchPending,

    #[error("stream is empty")]
    EmptyStream,
}

/// Render the single diagnostic line a mismatched `expect` writes to the
/// process's error stream (spec §6): downstream collaborators diff
/// formatter output against a reference implementation that depends on
/// this exact textual shape, not merely on `Display`.
///
/// Format: `path: [fun:line: ] expected type NAME got NAME<line:col>
/// ("lexeme")`. The bracketed `fun:line: ` segment is only present when
/// `verbose` is set.
pub fn format_expect_mismatch(
    path: &str,
    verbose: bool,
    func: &str,
    call_line: u32,
    expected: TokenKind,
    got: TokenKind,
    got_line: u32,
    got_column: u32,
    lexeme: &str,
) -> String {
    if verbose {
        format!(
            "{path}: {func}:{call_line}: expected type {expected:?} got {got:?}<{got_line}:{got_column}>(\"{lexeme}\")",
        )
    } else {
        format!(
            "{path}: expected type {expected:?} got {got:?}<{got_line}:{got_column}>(\"{lexeme}\")",
        )
    }
}
