//! The classifier: turns a [`Scanner`] over a [`Buffer`] into a fully
//! materialized [`TokenArena`] in one up-front pass (§4.2).
//!
//! Sub-modules own one concern each, matching the split the corpus already
//! uses for its own classifier (`lexer/{identifier,number,string,operator,
//! comment}.rs`):
//! - [`cpp`] — preprocessor directive recognition and disabled-region
//!   depth counting.
//! - [`ident`] — identifier scanning and the keyword exact-match check.
//! - [`literal`] — numeric and string/char literal scanning.
//! - [`punct`] — keyword-table-driven punctuator longest match.
//!
//! This module owns the parts that glue those together: the per-token
//! trivia collection (prefixes/suffixes), the `#if`/`#else`/`#endif`
//! branch-stack linker, and the top-level emission loop.

mod cpp;
mod ident;
mod literal;
mod punct;

use crate::buffer::Buffer;
use crate::scanner::Scanner;
use crate::token::{AttrFlags, BranchState, InstFlags, TokenArena, TokenData, TokenId, TokenKind};

/// Result of tokenizing one translation unit: the arena plus whether any
/// lexical error was latched along the way.
pub struct Tokenized {
    pub arena: TokenArena,
    pub errored: bool,
}

/// One step of dangling-trivia recognition: either nothing more to
/// consume, or a freshly classified trivia token.
enum Trivia {
    None,
    Item(TokenData),
}

struct Classifier<'a> {
    scanner: Scanner<'a>,
    arena: TokenArena,
    errored: bool,
    /// Per currently-open `#if` chain, the most recently linked arm.
    branch_stack: Vec<TokenId>,
}

impl<'a> Classifier<'a> {
    fn new(buffer: &'a Buffer) -> Self {
        Self {
            scanner: Scanner::new(buffer),
            arena: TokenArena::new(),
            errored: false,
            branch_stack: Vec::new(),
        }
    }

    fn note_error(&mut self) {
        if !self.errored {
            self.errored = true;
        }
        self.scanner.note_error();
    }

    /// Skip ASCII spaces and tabs (not newlines), and any backslash line
    /// continuation sitting in between — splicing physical lines together
    /// invisibly before the next token is classified, so a continuation
    /// appearing anywhere between tokens never perturbs the next token's
    /// reported line/column/offset.
    fn skip_horizontal_space(&mut self) {
        loop {
            match self.scanner.peek() {
                Some(b' ') | Some(b'\t') => {
                    self.scanner.getc();
                }
                Some(b'\\') if matches!(self.scanner.peek_at(1), Some(b'\n') | Some(b'\r')) => {
                    self.scanner.getc();
                    if self.scanner.peek() == Some(b'\r') {
                        self.scanner.getc();
                    }
                    if self.scanner.peek() == Some(b'\n') {
                        self.scanner.getc();
                    }
                }
                _ => break,
            }
        }
    }

    fn count_newlines_ahead(&mut self) -> u32 {
        let mut n = 0;
        loop {
            self.skip_horizontal_space();
            if self.scanner.peek() == Some(b'\n') {
                self.scanner.getc();
                n += 1;
            } else {
                break;
            }
        }
        n
    }

    /// Greedily consume leading dangling items (comments, cpp directives)
    /// before the next main token; §4.2 step 2.
    fn collect_prefixes(&mut self) -> Vec<TokenId> {
        let mut out = Vec::new();
        loop {
            // A run of blank lines before a leading comment/directive is
            // just absorbed; it only becomes a visible marker as a
            // *suffix* of the previous token (step 8), never a prefix.
            let save = self.scanner.state();
            self.skip_horizontal_space();
            while self.scanner.peek() == Some(b'\n') {
                self.scanner.getc();
                self.skip_horizontal_space();
            }
            match self.try_classify_dangling() {
                Trivia::None => {
                    self.scanner.restore(save);
                    break;
                }
                Trivia::Item(tok) => out.push(self.arena.push(tok)),
            }
        }
        out
    }

    /// Try to classify a single dangling item (line/block comment or cpp
    /// directive) at the current position. Does not consume anything on a
    /// miss.
    fn try_classify_dangling(&mut self) -> Trivia {
        match self.scanner.peek() {
            Some(b'/') if self.scanner.peek_at(1) == Some(b'/') => {
                Trivia::Item(self.lex_line_comment())
            }
            Some(b'/') if self.scanner.peek_at(1) == Some(b'*') => {
                Trivia::Item(self.lex_block_comment())
            }
            Some(b'#') if self.scanner.column() == 1 => Trivia::Item(cpp::lex_directive(self)),
            _ => Trivia::None,
        }
    }

    fn lex_line_comment(&mut self) -> TokenData {
        let (line, column, offset) = (self.scanner.line(), self.scanner.column(), self.scanner.offset());
        self.scanner.getc();
        self.scanner.getc();
        while let Some(b) = self.scanner.peek() {
            if b == b'\n' {
                break;
            }
            self.scanner.getc();
        }
        self.make_dangling(TokenKind::Comment, line, column, offset)
    }

    fn lex_block_comment(&mut self) -> TokenData {
        let (line, column, offset) = (self.scanner.line(), self.scanner.column(), self.scanner.offset());
        self.scanner.getc();
        self.scanner.getc();
        loop {
            match self.scanner.peek() {
                None => {
                    self.note_error();
                    break;
                }
                Some(b'*') if self.scanner.peek_at(1) == Some(b'/') => {
                    self.scanner.getc();
                    self.scanner.getc();
                    break;
                }
                Some(_) => {
                    self.scanner.getc();
                }
            }
        }
        self.make_dangling(TokenKind::Comment, line, column, offset)
    }

    fn make_dangling(&mut self, kind: TokenKind, line: u32, column: u32, offset: usize) -> TokenData {
        TokenData {
            kind,
            line,
            column,
            offset,
            len: self.scanner.offset() - offset,
            attrs: AttrFlags::NONE,
            inst: InstFlags::DANGLING,
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            branch: BranchState::Unlinked,
            prev: None,
            next: None,
        }
    }

    /// At most one trailing comment, then a blank-line marker if two or
    /// more newlines follow (§4.2 step 8).
    fn collect_suffixes(&mut self) -> Vec<TokenId> {
        let mut out = Vec::new();
        self.skip_horizontal_space();
        if matches!(
            self.scanner.peek(),
            Some(b'/')
        ) && matches!(self.scanner.peek_at(1), Some(b'/') | Some(b'*'))
        {
            let tok = if self.scanner.peek_at(1) == Some(b'/') {
                self.lex_line_comment()
            } else {
                self.lex_block_comment()
            };
            out.push(self.arena.push(tok));
        }

        let save = self.scanner.state();
        let newlines = self.count_newlines_ahead();
        if newlines >= 2 {
            let mut tok = self.make_dangling(TokenKind::Space, save.line, save.column, save.offset);
            tok.inst = tok.inst.with(InstFlags::NEWLINE);
            out.push(self.arena.push(tok));
        } else {
            self.scanner.restore(save);
        }
        out
    }

    /// Link the just-collected prefixes of `main_id` into the branch
    /// stack (§4.2 step 9).
    ///
    /// Each open chain's top-of-stack entry holds the most recently
    /// emitted arm with a provisional [`BranchState::Terminal`] (or, for
    /// the very first arm, [`BranchState::Unlinked`]) — "terminal until
    /// proven otherwise". Seeing the next arm upgrades that provisional
    /// state by filling in its `next` pointer via [`Classifier::link_forward`].
    fn link_branches(&mut self, main_id: TokenId, prefixes: &[TokenId]) {
        for &p in prefixes {
            match self.arena.get(p).kind {
                TokenKind::CppIf => {
                    self.branch_stack.push(main_id);
                }
                TokenKind::CppElse => {
                    if let Some(prev) = self.branch_stack.pop() {
                        self.link_forward(prev, main_id);
                        self.arena.get_mut(main_id).branch = BranchState::Terminal { prev };
                        self.branch_stack.push(main_id);
                    }
                }
                TokenKind::CppEndif => {
                    if let Some(prev) = self.branch_stack.pop() {
                        self.link_forward(prev, main_id);
                        self.arena.get_mut(main_id).branch = BranchState::Terminal { prev };
                    }
                }
                _ => {}
            }
        }
    }

    /// Fill in `id`'s forward link now that its successor arm is known,
    /// upgrading [`BranchState::Unlinked`] (head, no arm seen yet) to
    /// [`BranchState::Head`] and [`BranchState::Terminal`] (provisional
    /// last arm) to a fully-linked [`BranchState::Linked`].
    fn link_forward(&mut self, id: TokenId, next_id: TokenId) {
        let new_branch = match self.arena.get(id).branch {
            BranchState::Unlinked => BranchState::Head { next: next_id },
            BranchState::Terminal { prev } => BranchState::Linked { prev, next: next_id },
            other => other,
        };
        self.arena.get_mut(id).branch = new_branch;
    }

    fn push_main(&mut self, mut data: TokenData, prefixes: Vec<TokenId>, suffixes: Vec<TokenId>) -> TokenId {
        data.prefixes = prefixes.clone();
        data.suffixes = suffixes;
        let id = self.arena.push(data);
        self.link_branches(id, &prefixes);
        id
    }

    fn classify_one(&mut self) -> TokenData {
        if self.scanner.is_at_end() {
            return self.sentinel_here(TokenKind::Eof);
        }

        if let Some(punct) = punct::try_match(self) {
            return punct;
        }

        // `try_match` may have silently discarded one or more DISCARD
        // matches (a bare backslash not part of a line continuation, per
        // §4.2 step 4) before giving up on a real match; re-derive the
        // start position from the scanner's current offset, and re-check
        // EOF in case that discarding ran the scanner off the end.
        if self.scanner.is_at_end() {
            return self.sentinel_here(TokenKind::Eof);
        }
        let line = self.scanner.line();
        let column = self.scanner.column();
        let offset = self.scanner.offset();

        match self.scanner.peek().unwrap() {
            b'L' if matches!(self.scanner.peek_at(1), Some(b'"') | Some(b'\'')) => {
                self.scanner.getc();
                literal::lex_string_or_char(self, line, column, offset)
            }
            b'"' | b'\'' => literal::lex_string_or_char(self, line, column, offset),
            c if c.is_ascii_digit() => literal::lex_number(self, line, column, offset),
            c if c.is_ascii_alphabetic() || c == b'_' => ident::lex_identifier(self, line, column, offset),
            _ => {
                self.scanner.getc();
                self.note_error();
                self.sentinel(TokenKind::Unknown, line, column, offset)
            }
        }
    }

    fn sentinel(&mut self, kind: TokenKind, line: u32, column: u32, offset: usize) -> TokenData {
        self.finish(kind, AttrFlags::NONE, line, column, offset)
    }

    /// As [`Classifier::sentinel`], but captures the start position from
    /// the scanner's current position rather than a value the caller
    /// captured earlier — needed wherever bytes may have been silently
    /// consumed (DISCARD retries) between the caller's last capture and
    /// this call.
    fn sentinel_here(&mut self, kind: TokenKind) -> TokenData {
        let (line, column, offset) = (self.scanner.line(), self.scanner.column(), self.scanner.offset());
        self.sentinel(kind, line, column, offset)
    }

    /// Build a main-stream [`TokenData`] for a lexeme that ends exactly at
    /// the scanner's current position (bytes already consumed by the
    /// caller), stamping `len` from `offset`.
    pub(super) fn finish(
        &mut self,
        kind: TokenKind,
        attrs: AttrFlags,
        line: u32,
        column: u32,
        offset: usize,
    ) -> TokenData {
        TokenData {
            kind,
            line,
            column,
            offset,
            len: self.scanner.offset() - offset,
            attrs,
            inst: InstFlags::NONE,
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            branch: BranchState::Unlinked,
            prev: None,
            next: None,
        }
    }
}

/// Tokenize an entire translation unit up-front (§1 non-goal: not
/// incremental). Links the main stream's `prev`/`next` fields as tokens
/// are emitted.
pub fn tokenize(buffer: &Buffer) -> Tokenized {
    let mut c = Classifier::new(buffer);
    let mut last_main: Option<TokenId> = None;

    loop {
        let prefixes = c.collect_prefixes();
        c.skip_horizontal_space();
        let data = c.classify_one();
        let kind = data.kind;
        let is_eof = kind == TokenKind::Eof;
        let suffixes = if is_eof { Vec::new() } else { c.collect_suffixes() };
        let id = c.push_main(data, prefixes, suffixes);

        if let Some(prev) = last_main {
            c.arena.get_mut(prev).next = Some(id);
            c.arena.get_mut(id).prev = Some(prev);
        }
        last_main = Some(id);

        if is_eof {
            break;
        }
    }

    debug_assert!(
        c.branch_stack.is_empty(),
        "branch stack must be empty at EOF; an #if opened inside an enabled \
         region must be matched by an #endif before end of file"
    );

    Tokenized {
        arena: c.arena,
        errored: c.errored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<TokenKind> {
        let buffer = Buffer::from_str(src);
        let t = tokenize(&buffer);
        t.arena.iter_ids().map(|id| t.arena.get(id).kind).collect()
    }

    #[test]
    fn empty_file_is_eof_only() {
        assert_eq!(toks(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn simple_declaration() {
        assert_eq!(
            toks("int x = 1;"),
            vec![
                TokenKind::Int,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Literal,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn leading_and_trailing_comment_attach_as_trivia() {
        let buffer = Buffer::from_str("/* c */ int /* d */ x;");
        let t = tokenize(&buffer);
        let main: Vec<TokenId> = t.arena.iter_ids().filter(|id| !t.arena.get(*id).is_dangling()).collect();
        assert_eq!(t.arena.get(main[0]).kind, TokenKind::Int);
        assert_eq!(t.arena.get(main[0]).prefixes.len(), 1);
        assert_eq!(t.arena.get(main[1]).kind, TokenKind::Ident);
        assert_eq!(t.arena.get(main[1]).prefixes.len(), 1);
    }

    #[test]
    fn if_else_endif_forms_a_branch_chain() {
        let src = "#if A\nint x;\n#else\nlong x;\n#endif\n";
        let t = tokenize(&Buffer::from_str(src));
        let main: Vec<TokenId> = t.arena.iter_ids().filter(|id| !t.arena.get(*id).is_dangling()).collect();
        let kinds: Vec<_> = main.iter().map(|id| t.arena.get(*id).kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int,
                TokenKind::Ident,
                TokenKind::Semi,
                TokenKind::Long,
                TokenKind::Ident,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
        let int_id = main[0];
        let long_id = main[3];
        let eof_id = main[6];
        assert!(matches!(t.arena.get(int_id).branch, BranchState::Head { next } if next == long_id));
        assert!(t.arena.get(long_id).branch.is_fully_linked());
        assert!(matches!(t.arena.get(long_id).branch, BranchState::Linked { prev, next } if prev == int_id && next == eof_id));
        assert!(matches!(t.arena.get(eof_id).branch, BranchState::Terminal { prev } if prev == long_id));
    }

    #[test]
    fn disabled_region_is_a_single_cpp_prefix() {
        let src = "#if 0\n#if X\nint y;\n#endif\n#endif\nint z;\n";
        let t = tokenize(&Buffer::from_str(src));
        let main: Vec<TokenId> = t.arena.iter_ids().filter(|id| !t.arena.get(*id).is_dangling()).collect();
        assert_eq!(t.arena.get(main[0]).kind, TokenKind::Int);
        let prefixes = &t.arena.get(main[0]).prefixes;
        assert_eq!(prefixes.len(), 1);
        assert_eq!(t.arena.get(prefixes[0]).kind, TokenKind::Cpp);
        assert!(matches!(t.arena.get(main[0]).branch, BranchState::Unlinked));
    }

    #[test]
    fn blank_line_marker_needs_two_newlines() {
        let t = tokenize(&Buffer::from_str("x;\n\ny;"));
        let main: Vec<TokenId> = t.arena.iter_ids().filter(|id| !t.arena.get(*id).is_dangling()).collect();
        let semi = main[1];
        assert_eq!(t.arena.get(semi).suffixes.len(), 1);
        assert!(t.arena.get(t.arena.get(semi).suffixes[0]).inst.contains(InstFlags::NEWLINE));
    }

    #[test]
    fn single_newline_produces_no_marker() {
        let t = tokenize(&Buffer::from_str("x;\ny;"));
        let main: Vec<TokenId> = t.arena.iter_ids().filter(|id| !t.arena.get(*id).is_dangling()).collect();
        let semi = main[1];
        assert!(t.arena.get(semi).suffixes.is_empty());
    }

    #[test]
    fn unterminated_string_emits_eof_and_latches_error() {
        let t = tokenize(&Buffer::from_str("\"a"));
        let kinds: Vec<_> = t.arena.iter_ids().map(|id| t.arena.get(id).kind).collect();
        // The partial literal never appears as its own String token; it
        // collapses directly into the one terminal EOF (§4.2 step 6).
        assert_eq!(kinds, vec![TokenKind::Eof]);
        assert!(t.errored);
    }

    #[test]
    fn ellipsis_vs_double_dot() {
        assert_eq!(
            toks(".."),
            vec![TokenKind::Dot, TokenKind::Dot, TokenKind::Eof]
        );
        assert_eq!(toks("..."), vec![TokenKind::Ellipsis, TokenKind::Eof]);
    }

    #[test]
    fn wide_string_and_char_literals() {
        assert_eq!(toks("L\"x\""), vec![TokenKind::String, TokenKind::Eof]);
        assert_eq!(toks("L'x'"), vec![TokenKind::Literal, TokenKind::Eof]);
        assert_eq!(toks("L"), vec![TokenKind::Ident, TokenKind::Eof]);
    }
}
