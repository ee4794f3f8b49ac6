//! The single-position walk over a tokenized stream (§4.4).
//!
//! Pairs a borrowed, mutable [`TokenArena`] with a small `Copy` state
//! record so speculative lookahead is a literal save/restore rather than
//! an undo log: [`Cursor::peek_enter`]/[`Cursor::peek_leave`] push and pop
//! one snapshot, and every derived `peek_*`/`if_*` primitive below is just
//! that pair wrapped around the real operation. [`PeekGuard`] gives the
//! same shape as a `Drop`-based RAII scope for callers that want it.

use crate::buffer::Buffer;
use crate::error::{format_expect_mismatch, LexError};
use crate::token::{AttrFlags, BranchState, InstFlags, TokenArena, TokenData, TokenId, TokenKind};
use crate::type_phrase::{self, TypePhrase};

const MARKER_RING: usize = 2;

/// Snapshot of cursor position, trivially `Copy` so save/restore around a
/// peek is a plain assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorState {
    pub current: Option<TokenId>,
    pub peek_depth: u32,
    pub branch_pending: Option<TokenId>,
    pub error_latched: bool,
}

impl CursorState {
    fn start() -> Self {
        Self {
            current: None,
            peek_depth: 0,
            branch_pending: None,
            error_latched: false,
        }
    }
}

/// Walks one [`TokenArena`], exclusively: branch-take and recovery mutate
/// tokens (relinking stream pointers, flipping `branch` state, setting
/// `UNMUTE`), so the cursor holds the arena mutably rather than sharing it.
pub struct Cursor<'a> {
    arena: &'a mut TokenArena,
    buffer: &'a Buffer,
    state: CursorState,
    markers: Vec<TokenId>,
    path: String,
    verbose: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(arena: &'a mut TokenArena, buffer: &'a Buffer, path: impl Into<String>, verbose: bool) -> Self {
        Self {
            arena,
            buffer,
            state: CursorState::start(),
            markers: Vec::new(),
            path: path.into(),
            verbose,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn restore(&mut self, state: CursorState) {
        self.state = state;
    }

    pub fn is_peeking(&self) -> bool {
        self.state.peek_depth > 0
    }

    pub fn has_error(&self) -> bool {
        self.state.error_latched
    }

    pub fn branch_pending(&self) -> Option<TokenId> {
        self.state.branch_pending
    }

    pub fn data(&self, id: TokenId) -> &TokenData {
        self.arena.get(id)
    }

    /// Resolve a token's lexeme back into source text, for heuristics (the
    /// type-phrase recognizer's `__attribute__` check) that need to look at
    /// what was actually scanned, not just its kind.
    pub fn lexeme(&self, id: TokenId) -> Option<&str> {
        let tok = self.arena.get(id);
        self.buffer.slice_str(tok.offset, tok.len)
    }

    /// As [`Cursor::lexeme`], but resolves directly from a [`TokenData`]
    /// already in hand (e.g. one returned by [`Cursor::peek`]) without a
    /// second arena lookup.
    pub fn token_lexeme(&self, tok: &TokenData) -> Option<&str> {
        self.buffer.slice_str(tok.offset, tok.len)
    }

    fn note_error(&mut self) {
        if !self.is_peeking() {
            self.state.error_latched = true;
        }
    }

    fn first_token(&self) -> Option<TokenId> {
        self.arena.iter_ids().next()
    }

    fn remember(&mut self, id: TokenId) {
        if self.is_peeking() {
            return;
        }
        if self.markers.len() == MARKER_RING {
            self.markers.remove(0);
        }
        self.markers.push(id);
    }

    /// Advance (§4.4 `pop`). Fails without consuming when parked on a
    /// fully-linked branch token and not peeking — the *halt at branch*
    /// rule; the caller must [`Cursor::recover`] to pick a branch.
    pub fn pop(&mut self) -> Result<TokenId, LexError> {
        if self.arena.is_empty() {
            return Err(LexError::EmptyStream);
        }

        let candidate = match self.state.current {
            None => self.first_token().ok_or(LexError::EmptyStream)?,
            Some(cur) if self.arena.get(cur).kind == TokenKind::Eof => {
                return Err(LexError::EmptyStream);
            }
            Some(cur) => {
                if !self.is_peeking() && self.arena.get(cur).branch.is_fully_linked() {
                    return Err(LexError::BranchPending);
                }
                self.arena.get(cur).next.ok_or(LexError::EmptyStream)?
            }
        };

        if self.arena.get(candidate).branch.is_fully_linked() {
            if self.state.branch_pending.is_none() {
                self.state.branch_pending = Some(candidate);
            }
            if !self.is_peeking() {
                self.state.current = Some(candidate);
                return Err(LexError::BranchPending);
            }
            // Peeking: silently follow `next` links to the terminal
            // alternative, as if the last arm had been taken.
            let mut walk = candidate;
            while let Some(n) = self.arena.get(walk).branch.next() {
                walk = n;
            }
            self.state.current = Some(walk);
            self.remember(walk);
            return Ok(walk);
        }

        self.state.current = Some(candidate);
        self.remember(candidate);
        Ok(candidate)
    }

    /// The last token yielded by `pop` (`§4.4 back`).
    pub fn back(&self) -> Option<TokenId> {
        self.state.current
    }

    /// Push a copy of the entire cursor state, entering one peek frame.
    pub fn peek_enter(&mut self) -> CursorState {
        let saved = self.state;
        self.state.peek_depth += 1;
        saved
    }

    /// Pop the frame pushed by the matching `peek_enter`, restoring the
    /// cursor to exactly where it was.
    pub fn peek_leave(&mut self, saved: CursorState) {
        debug_assert!(self.state.peek_depth > 0, "peek_leave without a matching peek_enter");
        self.state = saved;
    }

    /// Keep what happened since the matching `peek_enter` instead of
    /// restoring it — only the peek-depth bookkeeping unwinds.
    pub(crate) fn commit_peek(&mut self, saved: CursorState) {
        debug_assert!(self.state.peek_depth > 0, "commit_peek without a matching peek_enter");
        self.state.peek_depth = saved.peek_depth;
    }

    /// Borrow a [`PeekGuard`] scope: restores on drop unless committed.
    pub fn peek_scope(&mut self) -> PeekGuard<'_, 'a> {
        PeekGuard::new(self)
    }

    /// One token of lookahead, non-destructive.
    pub fn peek(&mut self) -> Option<TokenData> {
        let saved = self.peek_enter();
        let tok = self.pop().ok().map(|id| self.arena.get(id).clone());
        self.peek_leave(saved);
        tok
    }

    /// The kind of the next token without consuming it.
    pub fn peek_kind(&mut self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Whether the next token has exact `kind`, without consuming.
    pub fn peek_if(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Consume the next token if it has exact `kind`.
    pub fn if_consume(&mut self, kind: TokenKind) -> Option<TokenId> {
        let saved = self.peek_enter();
        match self.pop() {
            Ok(id) if self.arena.get(id).kind == kind => {
                self.commit_peek(saved);
                Some(id)
            }
            _ => {
                self.peek_leave(saved);
                None
            }
        }
    }

    /// Whether the next token's attribute flags intersect `mask`, without
    /// consuming.
    pub fn peek_if_flags(&mut self, mask: AttrFlags) -> bool {
        self.peek().map(|t| t.attrs.intersects(mask)).unwrap_or(false)
    }

    /// Consume the next token if its attribute flags intersect `mask`.
    pub fn if_flags(&mut self, mask: AttrFlags) -> Option<TokenId> {
        let saved = self.peek_enter();
        match self.pop() {
            Ok(id) if self.arena.get(id).attrs.intersects(mask) => {
                self.commit_peek(saved);
                Some(id)
            }
            _ => {
                self.peek_leave(saved);
                None
            }
        }
    }

    /// Whether a balanced `open .. close` span starts at the next token,
    /// without consuming it.
    pub fn peek_if_pair(&mut self, open: TokenKind, close: TokenKind) -> Option<TokenId> {
        let saved = self.peek_enter();
        let result = self.scan_pair(open, close);
        self.peek_leave(saved);
        result
    }

    /// Consume a balanced `open .. close` span (nesting counted), if one
    /// starts at the next token. Returns the closing token.
    pub fn if_pair(&mut self, open: TokenKind, close: TokenKind) -> Option<TokenId> {
        let saved = self.peek_enter();
        match self.scan_pair(open, close) {
            Some(id) => {
                self.commit_peek(saved);
                Some(id)
            }
            None => {
                self.peek_leave(saved);
                None
            }
        }
    }

    fn scan_pair(&mut self, open: TokenKind, close: TokenKind) -> Option<TokenId> {
        let opener = self.pop().ok()?;
        if self.arena.get(opener).kind != open {
            return None;
        }
        let mut depth: u32 = 1;
        loop {
            let id = self.pop().ok()?;
            let kind = self.arena.get(id).kind;
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return Some(id);
                }
            } else if kind == TokenKind::Eof {
                return None;
            }
        }
    }

    /// Advance until `kind` is found (inclusive), failing if `stop` (when
    /// given) or EOF is reached first, without consuming.
    pub fn peek_until(&mut self, kind: TokenKind, stop: Option<TokenKind>) -> Option<TokenId> {
        let saved = self.peek_enter();
        let result = self.scan_until(kind, stop, false);
        self.peek_leave(saved);
        result
    }

    /// Consuming variant of [`Cursor::peek_until`].
    pub fn until(&mut self, kind: TokenKind, stop: Option<TokenKind>) -> Option<TokenId> {
        let saved = self.peek_enter();
        match self.scan_until(kind, stop, false) {
            Some(id) => {
                self.commit_peek(saved);
                Some(id)
            }
            None => {
                self.peek_leave(saved);
                None
            }
        }
    }

    /// Like [`Cursor::until`], but a `kind`/`stop` match nested inside a
    /// `(` or `{` span is ignored.
    pub fn peek_until_loose(&mut self, kind: TokenKind, stop: TokenKind) -> Option<TokenId> {
        let saved = self.peek_enter();
        let result = self.scan_until(kind, Some(stop), true);
        self.peek_leave(saved);
        result
    }

    fn scan_until(&mut self, kind: TokenKind, stop: Option<TokenKind>, loose: bool) -> Option<TokenId> {
        let mut depth: u32 = 0;
        loop {
            let id = self.pop().ok()?;
            let k = self.arena.get(id).kind;
            if loose {
                match k {
                    TokenKind::LParen | TokenKind::LBrace => {
                        depth += 1;
                        continue;
                    }
                    TokenKind::RParen | TokenKind::RBrace => {
                        depth = depth.saturating_sub(1);
                        continue;
                    }
                    _ if depth > 0 => continue,
                    _ => {}
                }
            }
            if k == kind {
                return Some(id);
            }
            if Some(k) == stop || k == TokenKind::Eof {
                return None;
            }
        }
    }

    /// Consume and assert `expected`; on mismatch, writes the single
    /// diagnostic line described in §6 and latches the error flag.
    pub fn expect(&mut self, expected: TokenKind, func: &str, call_line: u32) -> Result<TokenId, LexError> {
        let id = self.pop()?;
        let got = self.arena.get(id);
        if got.kind == expected {
            return Ok(id);
        }
        let (got_kind, got_line, got_col) = (got.kind, got.line, got.column);
        let lexeme = self.buffer.slice_str(got.offset, got.len).unwrap_or("");
        let err = LexError::ExpectMismatch {
            expected,
            got: got_kind,
            line: got_line,
            column: got_col,
        };
        // Speculative code is silent, and only the *first* committed
        // failure speaks (§7): a cursor parked on a pending branch, or one
        // that has already latched an error, never prints again.
        if !self.is_peeking() && !self.has_error() && self.branch_pending().is_none() {
            eprintln!(
                "{}",
                format_expect_mismatch(
                    &self.path, self.verbose, func, call_line, expected, got_kind, got_line, got_col, lexeme
                )
            );
            self.note_error();
        }
        Err(err)
    }

    /// Composite heuristic recognizing a C type phrase (§4.5). Never
    /// raises an error; only reports whether one was found.
    pub fn peek_if_type(&mut self) -> Option<TypePhrase> {
        type_phrase::recognize(self, false)
    }

    /// Consuming variant of [`Cursor::peek_if_type`].
    pub fn if_type(&mut self) -> Option<TypePhrase> {
        type_phrase::recognize(self, true)
    }

    pub(crate) fn mark_flag(&mut self, id: TokenId, flag: InstFlags) {
        let tok = self.arena.get_mut(id);
        tok.inst = tok.inst.with(flag);
    }

    /// Record the current token as a recovery marker.
    pub fn mark(&mut self) {
        if let Some(id) = self.state.current {
            self.remember(id);
        }
    }

    /// Drop every recorded recovery marker.
    pub fn purge_markers(&mut self) {
        self.markers.clear();
    }

    /// Take the pending branch (§4.4, four atomic steps): discard the
    /// alternative that was walked to reach it, relink the main stream
    /// around it, mark it `UNMUTE`, and park the cursor so the next `pop`
    /// yields it.
    pub fn take_branch(&mut self) -> Result<TokenId, LexError> {
        let target = self.state.branch_pending.ok_or(LexError::BranchPending)?;
        let prev = match self.arena.get(target).branch {
            BranchState::Linked { prev, .. } => Some(prev),
            BranchState::Terminal { prev } => Some(prev),
            _ => None,
        }
        .ok_or(LexError::BranchPending)?;

        let before = self.arena.get(prev).prev;
        if let Some(b) = before {
            self.arena.get_mut(b).next = Some(target);
        }
        self.arena.get_mut(target).prev = before;

        let next = self.arena.get(target).branch.next();
        self.arena.get_mut(target).branch = BranchState::Taken { next };
        self.mark_flag(target, InstFlags::UNMUTE);

        self.state.current = before;
        self.state.branch_pending = None;
        Ok(target)
    }

    /// Seek to the earliest surviving recovery marker, so the next `pop`
    /// resumes just after it. Returns the marker sought to, if any.
    fn seek_to_marker(&mut self) -> Option<TokenId> {
        let marker = *self.markers.first()?;
        self.state.current = Some(marker);
        self.markers.clear();
        Some(marker)
    }

    /// Composes branch-take and marker-seek into the one recovery
    /// operation exposed to collaborators: prefer taking a pending branch,
    /// otherwise seek to the earliest marker. Reports whether any progress
    /// was made.
    pub fn recover(&mut self) -> bool {
        if self.take_branch().is_ok() {
            return true;
        }
        self.seek_to_marker().is_some()
    }
}

/// RAII wrapper around [`Cursor::peek_enter`]/[`Cursor::peek_leave`],
/// mirroring the corpus's cursor snapshot/restore scope guard. Dropping
/// without calling [`PeekGuard::commit`] restores the cursor to where it
/// was when the guard was created.
pub struct PeekGuard<'c, 'a> {
    cursor: &'c mut Cursor<'a>,
    saved: CursorState,
    committed: bool,
}

impl<'c, 'a> PeekGuard<'c, 'a> {
    fn new(cursor: &'c mut Cursor<'a>) -> Self {
        let saved = cursor.peek_enter();
        Self {
            cursor,
            saved,
            committed: false,
        }
    }

    pub fn cursor(&mut self) -> &mut Cursor<'a> {
        self.cursor
    }

    /// Keep whatever the guarded operations did instead of restoring them.
    pub fn commit(mut self) {
        self.committed = true;
        self.cursor.commit_peek(self.saved);
    }
}

impl Drop for PeekGuard<'_, '_> {
    fn drop(&mut self) {
        if !self.committed {
            self.cursor.state = self.saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::classify;

    fn cursor_over(src: &str) -> (Buffer, TokenArena) {
        let buf = Buffer::from_str(src);
        let t = classify::tokenize(&buf);
        (buf, t.arena)
    }

    #[test]
    fn pop_walks_main_stream_in_order() {
        let (buf, mut arena) = cursor_over("int x;");
        let mut c = Cursor::new(&mut arena, &buf, "t.c", false);
        let int_id = c.pop().unwrap();
        assert_eq!(c.data(int_id).kind, TokenKind::Int);
        assert_eq!(c.back(), Some(int_id));
        assert_eq!(c.data(c.pop().unwrap()).kind, TokenKind::Ident);
        assert_eq!(c.data(c.pop().unwrap()).kind, TokenKind::Semi);
        assert_eq!(c.data(c.pop().unwrap()).kind, TokenKind::Eof);
    }

    #[test]
    fn pop_halts_on_fully_linked_branch_token() {
        let (buf, mut arena) = cursor_over("#if A\nint x;\n#else\nlong x;\n#endif\n");
        let mut c = Cursor::new(&mut arena, &buf, "t.c", false);
        // INT (head, not fully linked)
        assert_eq!(c.data(c.pop().unwrap()).kind, TokenKind::Int);
        assert_eq!(c.data(c.pop().unwrap()).kind, TokenKind::Ident);
        assert_eq!(c.data(c.pop().unwrap()).kind, TokenKind::Semi);
        // LONG is fully linked: halts here.
        assert!(matches!(c.pop(), Err(LexError::BranchPending)));
        assert_eq!(c.data(c.back().unwrap()).kind, TokenKind::Long);
    }

    #[test]
    fn peek_enter_leave_restores_state_bit_for_bit() {
        let (buf, mut arena) = cursor_over("int x;");
        let mut c = Cursor::new(&mut arena, &buf, "t.c", false);
        c.pop().unwrap();
        let before = c.state();
        let saved = c.peek_enter();
        c.pop().unwrap();
        c.pop().unwrap();
        c.peek_leave(saved);
        assert_eq!(c.state(), before);
    }

    #[test]
    fn if_pair_skips_balanced_parens() {
        let (buf, mut arena) = cursor_over("(a(b)c)d");
        let mut c = Cursor::new(&mut arena, &buf, "t.c", false);
        let close = c.if_pair(TokenKind::LParen, TokenKind::RParen).unwrap();
        assert_eq!(c.data(close).kind, TokenKind::RParen);
        let next = c.pop().unwrap();
        assert_eq!(c.data(next).kind, TokenKind::Ident);
    }

    #[test]
    fn take_branch_discards_the_walked_alternative() {
        let (buf, mut arena) = cursor_over("#if A\nint x;\n#else\nlong x;\n#endif\n");
        let mut c = Cursor::new(&mut arena, &buf, "t.c", false);
        c.pop().unwrap(); // INT
        c.pop().unwrap(); // x
        c.pop().unwrap(); // ;
        assert!(matches!(c.pop(), Err(LexError::BranchPending)));
        assert!(c.branch_pending().is_some());
        let taken = c.take_branch().unwrap();
        assert_eq!(c.data(taken).kind, TokenKind::Long);
        assert!(c.data(taken).inst.contains(InstFlags::UNMUTE));
        // Cursor is now parked right before LONG; the next pop yields it.
        assert_eq!(c.pop().unwrap(), taken);
    }

    #[test]
    fn expect_latches_only_on_the_first_mismatch() {
        let (buf, mut arena) = cursor_over("int x;");
        let mut c = Cursor::new(&mut arena, &buf, "t.c", false);
        assert!(!c.has_error());
        assert!(c.expect(TokenKind::Semi, "f", 1).is_err());
        assert!(c.has_error());
        // A second mismatch doesn't change anything further to observe
        // from the outside besides the flag already being latched.
        assert!(c.expect(TokenKind::Semi, "f", 2).is_err());
        assert!(c.has_error());
    }

    #[test]
    fn expect_never_latches_while_peeking() {
        let (buf, mut arena) = cursor_over("int x;");
        let mut c = Cursor::new(&mut arena, &buf, "t.c", false);
        let saved = c.peek_enter();
        assert!(c.expect(TokenKind::Semi, "f", 1).is_err());
        assert!(!c.has_error());
        c.peek_leave(saved);
        assert!(!c.has_error());
    }

    #[test]
    fn expect_does_not_latch_while_branch_parked() {
        let (buf, mut arena) = cursor_over("#if A\nint x;\n#else\nlong x;\n#endif\n");
        let mut c = Cursor::new(&mut arena, &buf, "t.c", false);
        c.pop().unwrap(); // INT
        c.pop().unwrap(); // x
        c.pop().unwrap(); // ;
        assert!(matches!(c.pop(), Err(LexError::BranchPending)));
        assert!(c.branch_pending().is_some());
        // `pop` itself never latches, and `expect` must not either while a
        // branch is pending — only a committed mismatch speaks (§7).
        assert!(!c.has_error());
        assert!(c.expect(TokenKind::Semi, "f", 1).is_err());
        assert!(!c.has_error());
    }
}
