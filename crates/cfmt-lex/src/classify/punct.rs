//! Punctuator longest match against the shared keyword/punctuator table
//! (§4.2 step 4).
//!
//! A single-byte probe first, extended one byte at a time while the
//! `AMBIGUOUS` flag says a longer lexeme might exist, longest match wins.
//! `...` is the one punctuator the table can't express as a flat entry
//! (it would make `.` ambiguous against a run of dots that never combine
//! into anything else): matched as an extension of a bare `.` instead.
//!
//! A `DISCARD`-flagged match (the backslash line continuation) is never
//! produced here as a real token: most continuations are already spliced
//! away by [`super::Classifier::skip_horizontal_space`] before this runs,
//! but a `\` can still surface here on its own (not immediately followed
//! by a newline) — per §4.2 step 4 ("skip any match flagged DISCARD...
//! and retry"), that match is silently consumed and probing resumes at
//! the next position, exactly like the keyword-table retry loop in the
//! original lexer.
use crate::keyword::{self, MAX_LEXEME_LEN};
use crate::token::{AttrFlags, TokenData, TokenKind};

use super::Classifier;

pub(super) fn try_match(c: &mut Classifier) -> Option<TokenData> {
    loop {
        c.scanner.peek()?;

        let mut buf = [0u8; MAX_LEXEME_LEN];
        let mut avail = 0;
        for (i, slot) in buf.iter_mut().enumerate() {
            match c.scanner.peek_at(i) {
                Some(b) => {
                    *slot = b;
                    avail += 1;
                }
                None => break,
            }
        }

        let (len, template) = (1..=avail).rev().find_map(|len| {
            std::str::from_utf8(&buf[..len])
                .ok()
                .and_then(keyword::lookup)
                .map(|t| (len, t))
        })?;

        if template.attrs.contains(AttrFlags::DISCARD) {
            for _ in 0..len {
                c.scanner.getc();
            }
            continue;
        }

        let line = c.scanner.line();
        let column = c.scanner.column();
        let offset = c.scanner.offset();

        if template.kind == TokenKind::Dot
            && len == 1
            && c.scanner.peek_at(1) == Some(b'.')
            && c.scanner.peek_at(2) == Some(b'.')
        {
            for _ in 0..3 {
                c.scanner.getc();
            }
            return Some(c.finish(TokenKind::Ellipsis, AttrFlags::NONE, line, column, offset));
        }

        for _ in 0..len {
            c.scanner.getc();
        }
        return Some(c.finish(template.kind, template.attrs, line, column, offset));
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::Buffer;
    use crate::classify::tokenize;
    use crate::token::TokenKind;

    fn toks(src: &str) -> Vec<TokenKind> {
        let buffer = Buffer::from_str(src);
        let t = tokenize(&buffer);
        t.arena.iter_ids().map(|id| t.arena.get(id).kind).collect()
    }

    #[test]
    fn longest_match_wins_over_prefix() {
        assert_eq!(toks("<<="), vec![TokenKind::ShlEq, TokenKind::Eof]);
        assert_eq!(toks("<<"), vec![TokenKind::Shl, TokenKind::Eof]);
        assert_eq!(toks("<"), vec![TokenKind::Lt, TokenKind::Eof]);
    }

    #[test]
    fn arrow_vs_minus_minus_vs_minus() {
        assert_eq!(toks("->"), vec![TokenKind::Arrow, TokenKind::Eof]);
        assert_eq!(toks("--"), vec![TokenKind::MinusMinus, TokenKind::Eof]);
        assert_eq!(toks("-="), vec![TokenKind::MinusEq, TokenKind::Eof]);
        assert_eq!(toks("-"), vec![TokenKind::Minus, TokenKind::Eof]);
    }

    #[test]
    fn backslash_newline_continuation_is_swallowed() {
        assert_eq!(
            toks("x\\\ny"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn standalone_backslash_is_discarded_without_error() {
        // Not a line continuation (no following newline), but §4.2 step 4
        // says to skip any DISCARD match and retry unconditionally — no
        // error, no Unknown token, same as the original lexer's keyword
        // retry loop.
        use crate::buffer::Buffer;
        use crate::classify::tokenize;
        let t = tokenize(&Buffer::from_str("x\\y"));
        assert!(!t.errored);
        assert_eq!(
            t.arena.iter_ids().map(|id| t.arena.get(id).kind).collect::<Vec<_>>(),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn standalone_backslash_at_true_eof_yields_eof_without_panicking() {
        use crate::buffer::Buffer;
        use crate::classify::tokenize;
        let t = tokenize(&Buffer::from_str("x\\"));
        assert!(!t.errored);
        assert_eq!(
            t.arena.iter_ids().map(|id| t.arena.get(id).kind).collect::<Vec<_>>(),
            vec![TokenKind::Ident, TokenKind::Eof]
        );
    }
}
