//! `cfmt-lex` — the C formatter's lexer: tokenization of a translation unit
//! into a doubly-linked, trivia-enriched token stream, plus the
//! speculative-execution [`Cursor`] substrate the parser walks it with.
//!
//! The pipeline, leaf to root: a [`Buffer`] owns the source bytes; a
//! [`scanner::Scanner`] reads them byte-for-byte; the classifier (private —
//! see the `classify` module) recognizes keywords, punctuators, literals,
//! identifiers, comments, and preprocessor directives in one up-front pass,
//! attaching trivia as prefixes/suffixes and linking `#if`/`#else`/`#endif`
//! chains as it goes; the result is a [`TokenArena`]. [`Lexer`] owns the
//! buffer and arena for one translation unit and hands out a [`Cursor`] for
//! the parser to walk.
//!
//! ```
//! use cfmt_lex::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("int x = 1;", "t.c", false);
//! let mut cursor = lexer.cursor();
//! assert_eq!(cursor.data(cursor.pop().unwrap()).kind, TokenKind::Int);
//! ```

mod buffer;
mod classify;
mod cursor;
mod error;
mod keyword;
mod scanner;
mod token;
mod type_phrase;

pub use buffer::Buffer;
pub use cursor::{Cursor, CursorState, PeekGuard};
pub use error::{format_expect_mismatch, LexError};
pub use keyword::{lookup as lookup_keyword, TokenTemplate};
pub use scanner::{Scanner, ScannerState, EOF_BYTE};
pub use token::{AttrFlags, BranchState, InstFlags, TokenArena, TokenData, TokenId, TokenKind};
pub use type_phrase::TypePhrase;

/// Owns one translation unit's [`Buffer`] and [`TokenArena`] and hands out
/// a [`Cursor`] over them.
///
/// Tokenization happens once, eagerly, in [`Lexer::new`] (§1 non-goal: not
/// incremental). `path` and `verbose` are only used for the one diagnostic
/// line a mismatched [`Cursor::expect`] can write; the lexer reads nothing
/// else out of the driver's configuration bundle.
pub struct Lexer {
    buffer: Buffer,
    arena: TokenArena,
    errored: bool,
    path: String,
    verbose: bool,
}

impl Lexer {
    /// Tokenize `source` up front. `path` is carried only for diagnostics.
    pub fn new(source: impl Into<Vec<u8>>, path: impl Into<String>, verbose: bool) -> Self {
        let buffer = Buffer::from_bytes(source);
        let tokenized = classify::tokenize(&buffer);
        Self {
            buffer,
            arena: tokenized.arena,
            errored: tokenized.errored,
            path: path.into(),
            verbose,
        }
    }

    /// A [`Cursor`] parked before the first token, ready for `pop`.
    pub fn cursor(&mut self) -> Cursor<'_> {
        Cursor::new(&mut self.arena, &self.buffer, self.path.clone(), self.verbose)
    }

    /// The buffer backing every lexeme this translation unit's tokens
    /// reference.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// A copy of the source bytes with a trailing NUL appended, for
    /// collaborators (e.g. a C library binding) that want a C string
    /// on demand without the lexer itself carrying one permanently.
    pub fn buffer_as_cstr_bytes(&self) -> Vec<u8> {
        let mut bytes = self.buffer.as_bytes().to_vec();
        bytes.push(0);
        bytes
    }

    /// Whether a lexical error was latched while tokenizing (§7 kind 2).
    /// Distinct from any `expect`-mismatch error a caller's parsing latches
    /// afterward through the returned [`Cursor`].
    pub fn has_lex_error(&self) -> bool {
        self.errored
    }

    /// Number of tokens in the arena, DANGLING ones included.
    pub fn token_count(&self) -> usize {
        self.arena.len()
    }

    /// The path this lexer was constructed with, for diagnostics.
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexer_tokenizes_eagerly_and_exposes_a_cursor() {
        let mut lexer = Lexer::new("int x;", "t.c", false);
        assert!(!lexer.has_lex_error());
        let mut cursor = lexer.cursor();
        assert_eq!(cursor.data(cursor.pop().unwrap()).kind, TokenKind::Int);
        assert_eq!(cursor.data(cursor.pop().unwrap()).kind, TokenKind::Ident);
        assert_eq!(cursor.data(cursor.pop().unwrap()).kind, TokenKind::Semi);
        assert_eq!(cursor.data(cursor.pop().unwrap()).kind, TokenKind::Eof);
    }

    #[test]
    fn unterminated_literal_latches_lex_error() {
        let lexer = Lexer::new("\"unterminated", "t.c", false);
        assert!(lexer.has_lex_error());
    }

    #[test]
    fn buffer_as_cstr_bytes_appends_nul() {
        let lexer = Lexer::new("int x;", "t.c", false);
        let bytes = lexer.buffer_as_cstr_bytes();
        assert_eq!(bytes.last(), Some(&0));
        assert_eq!(&bytes[..bytes.len() - 1], lexer.buffer().as_bytes());
    }

    #[test]
    fn two_cursors_over_the_same_lexer_are_independent() {
        let mut lexer = Lexer::new("int x;", "t.c", false);
        {
            let mut cursor = lexer.cursor();
            cursor.pop().unwrap();
        }
        // The arena is unaffected by a cursor going out of scope; a fresh
        // cursor starts over from the beginning.
        let mut cursor = lexer.cursor();
        assert_eq!(cursor.data(cursor.pop().unwrap()).kind, TokenKind::Int);
    }
}
