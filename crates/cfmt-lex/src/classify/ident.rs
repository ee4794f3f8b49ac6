//! Identifier scanning and the keyword exact-match check (§4.2 step 5).
//!
//! An identifier is a maximal run of alphanumerics and underscores
//! starting with a letter or underscore (the caller has already checked
//! the first byte). Once the whole word is scanned, one lookup against
//! the shared keyword table decides whether it names a keyword or is a
//! plain `Ident` — no keyword is a single byte, so this never collides
//! with the punctuator probe in [`super::punct`].

use crate::keyword;
use crate::token::{AttrFlags, TokenData, TokenKind};

use super::Classifier;

pub(super) fn lex_identifier(c: &mut Classifier, line: u32, column: u32, offset: usize) -> TokenData {
    while let Some(b) = c.scanner.peek() {
        if b.is_ascii_alphanumeric() || b == b'_' {
            c.scanner.getc();
        } else {
            break;
        }
    }

    let len = c.scanner.offset() - offset;
    let lexeme = std::str::from_utf8(c.scanner.slice(offset, len)).unwrap_or("");

    match keyword::lookup(lexeme) {
        Some(template) => c.finish(template.kind, template.attrs, line, column, offset),
        None => c.finish(TokenKind::Ident, AttrFlags::NONE, line, column, offset),
    }
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
    fn plain_identifier() {
        assert_eq!(toks("foo_bar1"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn keyword_is_not_an_identifier() {
        assert_eq!(toks("struct"), vec![TokenKind::Struct, TokenKind::Eof]);
    }

    #[test]
    fn keyword_prefix_identifier_is_still_an_identifier() {
        assert_eq!(toks("structural"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn underscore_led_identifier() {
        assert_eq!(toks("_private"), vec![TokenKind::Ident, TokenKind::Eof]);
    }
}
