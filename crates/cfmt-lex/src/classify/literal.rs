//! String/char and numeric literal scanning (§4.2 step 5).
//!
//! String and char literals share one scan: quote-matched, with any
//! backslash escaping exactly the one byte that follows it (including a
//! backslash escaping a quote, or escaping itself). A raw newline inside a
//! literal is just another byte — the scan continues across it looking
//! for the real closing quote, the same as the original C lexer. Only
//! running off the true end of file before a closing quote is unterminated,
//! and that collapses straight into the terminal `EOF` token (§4.2 step 6),
//! never panicking or consuming past it.
//!
//! Numeric literals are scanned permissively: a leading ASCII digit, then
//! any run of hex digits, `.`, and the case-insensitive suffix letters
//! `x`/`l`/`u` (covers hex, octal, float, and integer-suffix forms alike).
//! This lexer reports a literal's *span*, not its parsed value or radix —
//! interpreting the digits is the parser's concern.

use crate::token::{AttrFlags, TokenData, TokenKind};

use super::Classifier;

pub(super) fn lex_string_or_char(c: &mut Classifier, line: u32, column: u32, offset: usize) -> TokenData {
    let quote = match c.scanner.peek() {
        Some(q) => q,
        None => return c.finish(TokenKind::Error, AttrFlags::NONE, line, column, offset),
    };
    let kind = if quote == b'"' { TokenKind::String } else { TokenKind::Literal };
    c.scanner.getc();

    loop {
        match c.scanner.peek() {
            // True end of file mid-literal: §4.2 step 6 — the partial
            // literal is never emitted as its own token, it collapses into
            // the terminal EOF.
            None => {
                c.note_error();
                return c.finish(TokenKind::Eof, AttrFlags::NONE, line, column, offset);
            }
            Some(b'\\') => {
                c.scanner.getc();
                match c.scanner.peek() {
                    None => {
                        c.note_error();
                        break;
                    }
                    Some(_) => {
                        c.scanner.getc();
                    }
                }
            }
            Some(b) if b == quote => {
                c.scanner.getc();
                break;
            }
            Some(_) => {
                c.scanner.getc();
            }
        }
    }

    c.finish(kind, AttrFlags::NONE, line, column, offset)
}

pub(super) fn lex_number(c: &mut Classifier, line: u32, column: u32, offset: usize) -> TokenData {
    c.scanner.getc();
    while let Some(b) = c.scanner.peek() {
        let lower = b.to_ascii_lowercase();
        if b.is_ascii_hexdigit() || lower == b'x' || lower == b'l' || lower == b'u' || b == b'.' {
            c.scanner.getc();
        } else {
            break;
        }
    }
    c.finish(TokenKind::Literal, AttrFlags::NONE, line, column, offset)
}

#[cfg(test)]
mod tests {
    use crate::buffer::Buffer;
    use crate::classify::tokenize;
    use crate::token::TokenKind;

    fn toks(src: &str) -> Vec<TokenKind> {
        let t = tokenize(&Buffer::from_str(src));
        t.arena.iter_ids().map(|id| t.arena.get(id).kind).collect()
    }

    #[test]
    fn simple_string_literal() {
        assert_eq!(toks("\"hello\""), vec![TokenKind::String, TokenKind::Eof]);
    }

    #[test]
    fn escaped_quote_does_not_terminate_string() {
        assert_eq!(toks("\"a\\\"b\""), vec![TokenKind::String, TokenKind::Eof]);
    }

    #[test]
    fn char_literal() {
        assert_eq!(toks("'a'"), vec![TokenKind::Literal, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_char_literal_collapses_to_eof() {
        let t = tokenize(&Buffer::from_str("'a"));
        assert!(t.errored);
        assert_eq!(toks("'a"), vec![TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_after_escaped_backslash_collapses_to_eof() {
        // `"a\\" b"` — one STRING `"a\\"`, an IDENT `b`, then a lone `"`
        // that never closes: it collapses into the terminal EOF rather
        // than appearing as its own token.
        let t = tokenize(&Buffer::from_str("\"a\\\\\" b\""));
        assert!(t.errored);
        assert_eq!(
            t.arena.iter_ids().map(|id| t.arena.get(id).kind).collect::<Vec<_>>(),
            vec![TokenKind::String, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn raw_newline_inside_literal_does_not_terminate_it() {
        // A bare newline is just another consumed byte; the scan keeps
        // looking for the real closing quote across it, matching the
        // original C lexer (no line-based early termination).
        assert_eq!(toks("\"a\nb\""), vec![TokenKind::String, TokenKind::Eof]);
        let t = tokenize(&Buffer::from_str("\"a\nb\""));
        assert!(!t.errored);
    }

    #[test]
    fn integer_literal() {
        assert_eq!(toks("42"), vec![TokenKind::Literal, TokenKind::Eof]);
    }

    #[test]
    fn hex_literal_with_suffix() {
        assert_eq!(toks("0x1AuL"), vec![TokenKind::Literal, TokenKind::Eof]);
    }

    #[test]
    fn float_literal() {
        assert_eq!(toks("3.14"), vec![TokenKind::Literal, TokenKind::Eof]);
    }
}
