//! Preprocessor directive classification (§4.2 step 2, §9).
//!
//! A directive starts at `#` in column 1 and runs to the end of its
//! logical line — a trailing backslash continues it onto the next
//! physical line, and a block comment opened inside a directive is part
//! of the directive even if it spans further physical lines than the
//! backslash continuations do. Every directive is DANGLING; only its
//! *kind* (`CppIf`/`CppElse`/`CppEndif`/plain `Cpp`) matters to the
//! branch linker in [`super`].
//!
//! `#if 0` and `#ifdef notyet` name the two spellings this formatter
//! treats as permanently disabled regions. Their entire body — however
//! much source it holds, including further nested `#if`/`#endif` pairs
//! and what would otherwise be ordinary main-stream tokens — is swallowed
//! up to the matching `#endif` and collapsed into a single `Cpp` prefix
//! token, never pushed onto the branch stack (resolving the open question
//! in §9: hygiene is instead enforced by the `debug_assert!` at end of
//! file in [`super::tokenize`]).

use crate::token::{TokenData, TokenKind};

use super::Classifier;

pub(super) fn lex_directive(c: &mut Classifier) -> TokenData {
    let line = c.scanner.line();
    let column = c.scanner.column();
    let offset = c.scanner.offset();

    let text = consume_logical_line(c);

    if is_disabled_if(&text) {
        consume_disabled_region(c);
        return c.make_dangling(TokenKind::Cpp, line, column, offset);
    }

    let kind = if starts_if(&text) {
        TokenKind::CppIf
    } else if is_else(&text) {
        TokenKind::CppElse
    } else if is_endif(&text) {
        TokenKind::CppEndif
    } else {
        TokenKind::Cpp
    };
    c.make_dangling(kind, line, column, offset)
}

/// Consume from `#` through the end of the directive's logical line,
/// following backslash continuations and skipping over any block comment
/// opened along the way, returning the accumulated text for
/// classification (leading `#` and surrounding whitespace included).
fn consume_logical_line(c: &mut Classifier) -> String {
    let mut text = String::new();
    loop {
        match c.scanner.peek() {
            None => break,
            Some(b'\n') => break,
            Some(b'\\') if matches!(c.scanner.peek_at(1), Some(b'\n') | Some(b'\r')) => {
                c.scanner.getc();
                if c.scanner.peek() == Some(b'\r') {
                    c.scanner.getc();
                }
                if c.scanner.peek() == Some(b'\n') {
                    c.scanner.getc();
                }
                text.push(' ');
            }
            Some(b'/') if c.scanner.peek_at(1) == Some(b'*') => {
                c.scanner.getc();
                c.scanner.getc();
                loop {
                    match c.scanner.peek() {
                        None => {
                            c.note_error();
                            break;
                        }
                        Some(b'*') if c.scanner.peek_at(1) == Some(b'/') => {
                            c.scanner.getc();
                            c.scanner.getc();
                            break;
                        }
                        Some(_) => {
                            c.scanner.getc();
                        }
                    }
                }
            }
            Some(b) => {
                text.push(b as char);
                c.scanner.getc();
            }
        }
    }
    text
}

/// Having just consumed a disabled `#if`'s own line (depth 1 already
/// open), swallow bytes until the matching `#endif`, tracking nested
/// `#if`/`#ifdef`/`#ifndef` and `#endif` lines by depth; `#else`/`#elif`
/// inside a disabled region don't change depth and are swallowed like any
/// other byte.
fn consume_disabled_region(c: &mut Classifier) {
    let mut depth: u32 = 1;
    loop {
        loop {
            match c.scanner.peek() {
                None => return,
                Some(b'#') if c.scanner.column() == 1 => break,
                Some(_) => {
                    c.scanner.getc();
                }
            }
        }
        let text = consume_logical_line(c);
        if starts_if(&text) {
            depth += 1;
        } else if is_endif(&text) {
            depth -= 1;
            if depth == 0 {
                return;
            }
        }
    }
}

fn directive_word(text: &str) -> &str {
    text.trim_start()
        .strip_prefix('#')
        .unwrap_or(text)
        .trim_start()
}

fn starts_if(text: &str) -> bool {
    directive_word(text).starts_with("if")
}

fn is_disabled_if(text: &str) -> bool {
    let rest = directive_word(text);
    if let Some(cond) = rest.strip_prefix("if") {
        if cond.trim() == "0" {
            return true;
        }
    }
    if let Some(name) = rest.strip_prefix("ifdef") {
        if name.trim() == "notyet" {
            return true;
        }
    }
    false
}

fn is_else(text: &str) -> bool {
    let rest = directive_word(text);
    rest.starts_with("else") || rest.starts_with("elif")
}

fn is_endif(text: &str) -> bool {
    directive_word(text).starts_with("endif")
}

#[cfg(test)]
mod tests {
    use crate::buffer::Buffer;
    use crate::classify::tokenize;
    use crate::token::TokenKind;

    fn main_tokens(src: &str) -> Vec<TokenKind> {
        let t = tokenize(&Buffer::from_str(src));
        t.arena
            .iter_ids()
            .filter(|id| !t.arena.get(*id).is_dangling())
            .map(|id| t.arena.get(id).kind)
            .collect()
    }

    #[test]
    fn plain_directive_is_dangling_cpp() {
        let t = tokenize(&Buffer::from_str("#define X 1\nint y;\n"));
        let main: Vec<_> = t
            .arena
            .iter_ids()
            .filter(|id| !t.arena.get(*id).is_dangling())
            .collect();
        assert_eq!(t.arena.get(main[0]).prefixes.len(), 1);
        assert_eq!(t.arena.get(t.arena.get(main[0]).prefixes[0]).kind, TokenKind::Cpp);
    }

    #[test]
    fn backslash_continued_directive_is_one_token() {
        let t = tokenize(&Buffer::from_str("#define X \\\n  1\nint y;\n"));
        let main: Vec<_> = t
            .arena
            .iter_ids()
            .filter(|id| !t.arena.get(*id).is_dangling())
            .collect();
        assert_eq!(t.arena.get(main[0]).kind, TokenKind::Int);
        assert_eq!(t.arena.get(main[0]).prefixes.len(), 1);
    }

    #[test]
    fn ifdef_notyet_is_a_disabled_region() {
        assert_eq!(
            main_tokens("#ifdef notyet\nint a;\n#endif\nint z;\n"),
            vec![TokenKind::Int, TokenKind::Ident, TokenKind::Semi, TokenKind::Eof]
        );
    }

    #[test]
    fn if_with_no_space_before_the_condition_still_opens_a_branch() {
        use crate::token::BranchState;
        let t = tokenize(&Buffer::from_str("#if(A)\nint x;\n#endif\n"));
        let main: Vec<_> = t
            .arena
            .iter_ids()
            .filter(|id| !t.arena.get(*id).is_dangling())
            .collect();
        assert_eq!(t.arena.get(main[0]).kind, TokenKind::Int);
        let prefixes = &t.arena.get(main[0]).prefixes;
        assert_eq!(t.arena.get(prefixes[0]).kind, TokenKind::CppIf);
        assert!(matches!(t.arena.get(main[0]).branch, BranchState::Head { .. }));
    }

    #[test]
    fn nested_if_inside_disabled_region_does_not_end_it_early() {
        let t = tokenize(&Buffer::from_str("#if 0\n#if X\nint y;\n#endif\n#endif\nint z;\n"));
        let main: Vec<_> = t
            .arena
            .iter_ids()
            .filter(|id| !t.arena.get(*id).is_dangling())
            .collect();
        assert_eq!(t.arena.get(main[0]).kind, TokenKind::Int);
        let prefixes = &t.arena.get(main[0]).prefixes;
        assert_eq!(prefixes.len(), 1);
        assert_eq!(t.arena.get(prefixes[0]).kind, TokenKind::Cpp);
    }
}
