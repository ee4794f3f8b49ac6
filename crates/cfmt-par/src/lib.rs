//! `cfmt-par` — the parser's public shape, not its grammar.
//!
//! The parser is one of the collaborators §1 treats as external to the
//! lexer core: this crate wraps a [`cfmt_lex::Lexer`] with the signatures
//! the rest of the formatter commits to (`alloc`/`get_lexer`/`exec`) and
//! shows, in [`Parser::parse_translation_unit`], the consumption pattern a
//! real grammar would follow — pop tokens, consult `peek_if_type`, hand
//! branch recovery back to the lexer's [`cfmt_lex::Cursor`] — without
//! building an AST or implementing any production rule.

use bumpalo::Bump;

use cfmt_lex::{Cursor, Lexer, LexError, TokenId, TokenKind};
use cfmt_util::{Diagnostic, Handler, Span};

/// Wraps one translation unit's [`Lexer`] together with the arena a real
/// grammar would allocate AST nodes out of, and the [`Handler`] it would
/// report semantic diagnostics through.
pub struct Parser {
    lexer: Lexer,
    arena: Bump,
    handler: Handler,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Self {
            lexer,
            arena: Bump::new(),
            handler: Handler::new(),
        }
    }

    /// Allocate a value in the parser's arena. A real grammar would stamp
    /// out AST nodes here instead of `Box`ing or `Vec`-pushing them one at
    /// a time; this crate never calls it with anything but the placeholder
    /// unit type, since it builds no AST.
    pub fn alloc<T>(&self, value: T) -> &T {
        self.arena.alloc(value)
    }

    pub fn get_lexer(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Entry point a driver calls once per translation unit. Delegates to
    /// [`Parser::parse_translation_unit`]; a full implementation would
    /// additionally run the document-IR execution pass this crate does not
    /// own.
    pub fn exec(&mut self) -> bool {
        self.parse_translation_unit();
        !self.handler.has_errors() && !self.lexer.has_lex_error()
    }

    /// Demonstrates the cursor consumption pattern a declaration/statement
    /// grammar would use, without building anything: pop tokens off the
    /// cursor, consult `peek_if_type` at each top-level position the way a
    /// declaration parser would before committing to a production, and
    /// hand `#if`/`#else`/`#endif` branch exploration back to the cursor's
    /// `recover` when `pop` halts.
    pub fn parse_translation_unit(&mut self) {
        let mut cursor = self.lexer.cursor();
        loop {
            match cursor.pop() {
                Ok(id) if cursor.data(id).kind == TokenKind::Eof => break,
                Ok(_) => {
                    // A real grammar would dispatch on `cursor.peek_if_type()`
                    // here to choose between a declaration and a statement
                    // production; this crate does not implement either.
                    let _ = cursor.peek_if_type();
                }
                Err(LexError::BranchPending) => {
                    if !cursor.recover() {
                        self.handler.error(
                            "unresolved #if/#else/#endif branch at end of input",
                            Span::new(0, 0, 0, 0),
                        );
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    }
}

/// The callback shape an (unimplemented) operator-precedence expression
/// grammar would thread through recursive descent: `expr_exec` drives one
/// more step of the climb at `min_prec`, `expr_peek` asks whether the
/// token under the cursor could extend the expression at all. Neither
/// callback is ever installed with real logic by this crate — expression
/// parsing is grammar, which is out of scope here (§1).
pub struct ExprExecArg {
    pub min_prec: u8,
    pub expr_exec: fn(&mut Parser, &ExprExecArg) -> Result<TokenId, Diagnostic>,
    pub expr_peek: fn(&mut Cursor, &ExprExecArg) -> bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfmt_lex::Lexer;

    #[test]
    fn exec_runs_to_eof_on_well_formed_input() {
        let lexer = Lexer::new("int x = 1;", "t.c", false);
        let mut parser = Parser::new(lexer);
        assert!(parser.exec());
    }

    #[test]
    fn exec_recovers_through_an_if_else_branch() {
        let lexer = Lexer::new("#if A\nint x;\n#else\nlong x;\n#endif\n", "t.c", false);
        let mut parser = Parser::new(lexer);
        assert!(parser.exec());
    }

    #[test]
    fn alloc_hands_back_an_arena_reference() {
        let lexer = Lexer::new("", "t.c", false);
        let parser = Parser::new(lexer);
        let value: &u32 = parser.alloc(42);
        assert_eq!(*value, 42);
    }
}
