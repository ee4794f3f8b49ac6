//! The type-phrase recognizer (§4.5): a heuristic that looks ahead from the
//! cursor's current position and decides whether a C type phrase starts
//! there, without ever raising an error — it always runs inside a peek
//! frame, so a failed guess costs nothing but the lookahead itself.
//!
//! This lives in the lexer (not the parser) because it only needs
//! [`AttrFlags`] and the [`Cursor`] primitives already defined here; the
//! parser's grammar decides what a recognized type phrase *means*, this
//! module only decides where one ends.

use crate::cursor::Cursor;
use crate::token::{AttrFlags, InstFlags, TokenId, TokenKind};

/// What the recognizer found: the span of tokens it consumed (or would
/// consume, for the non-destructive [`Cursor::peek_if_type`] variant), plus
/// the handful of facts the parser needs to build a declarator around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypePhrase {
    /// First token of the phrase.
    pub start: TokenId,
    /// Last token of the phrase.
    pub end: TokenId,
    /// The tag identifier after `struct`/`union`/`enum`, if one was taken.
    pub tag_ident: Option<TokenId>,
    /// Number of leading `*` consumed.
    pub pointer_depth: u32,
    /// Whether this matched the function-pointer form
    /// `( * ident? []? ) ( … )`.
    pub is_function_pointer: bool,
}

/// Entry point for both [`Cursor::peek_if_type`] (`consume = false`) and
/// [`Cursor::if_type`] (`consume = true`).
pub(crate) fn recognize(cursor: &mut Cursor, consume: bool) -> Option<TypePhrase> {
    let saved = cursor.peek_enter();
    let result = scan(cursor);
    if consume && result.is_some() {
        cursor.commit_peek(saved);
    } else {
        cursor.peek_leave(saved);
    }
    result
}

fn scan(cursor: &mut Cursor) -> Option<TypePhrase> {
    if let Some(fp) = try_function_pointer(cursor) {
        return Some(fp);
    }

    let mut start: Option<TokenId> = None;
    let mut end: Option<TokenId> = None;
    let mut tag_ident = None;
    let mut pointer_depth = 0u32;
    let mut count = 0u32;
    let mut last_was_type_flagged = false;

    loop {
        let before = cursor.state();
        let Some(next) = cursor.peek() else { break };

        if next.attrs.intersects(AttrFlags::TYPE | AttrFlags::QUALIFIER | AttrFlags::STORAGE) {
            let id = cursor.pop().ok()?;
            start.get_or_insert(id);
            end = Some(id);
            count += 1;
            last_was_type_flagged = true;

            if next.attrs.contains(AttrFlags::IDENT) {
                if cursor.peek_if(TokenKind::Ident) {
                    let tid = cursor.pop().ok()?;
                    tag_ident = Some(tid);
                    end = Some(tid);
                }
            }
            if cursor.peek_if(TokenKind::LBracket) {
                if let Some(close) = cursor.if_pair(TokenKind::LBracket, TokenKind::RBracket) {
                    end = Some(close);
                }
            }
            continue;
        }

        if next.kind == TokenKind::Star {
            if count == 0 {
                // A `*` at the very start is not a type.
                break;
            }
            let star_id = cursor.pop().ok()?;
            if cursor.peek_if(TokenKind::Ident) {
                // The identifier belongs to the declarator, not the type.
                cursor.restore(before);
                break;
            }
            pointer_depth += 1;
            end = Some(star_id);
            count += 1;
            last_was_type_flagged = false;
            continue;
        }

        if next.kind == TokenKind::Ident {
            let is_first = count == 0;
            let id = cursor.pop().ok()?;
            let after = cursor.peek();

            if is_first {
                if matches!(after.as_ref().map(|t| t.kind), Some(TokenKind::RParen) | Some(TokenKind::Comma)) {
                    start.get_or_insert(id);
                    end = Some(id);
                    count += 1;
                    break;
                }
            }

            let stops = match after.as_ref() {
                Some(t) if t.attrs.intersects(AttrFlags::ASSIGN) => true,
                Some(t) => match t.kind {
                    TokenKind::LBracket
                    | TokenKind::RParen
                    | TokenKind::Semi
                    | TokenKind::Comma
                    | TokenKind::Colon => true,
                    TokenKind::LParen => !peeks_star_after_lparen(cursor),
                    TokenKind::Ident => cursor.token_lexeme(t) == Some("__attribute__"),
                    _ => false,
                },
                None => false,
            };

            if stops {
                cursor.restore(before);
                break;
            }

            start.get_or_insert(id);
            end = Some(id);
            count += 1;
            last_was_type_flagged = false;
            continue;
        }

        break;
    }

    let (start, end) = (start?, end?);

    // A lone QUALIFIER or STORAGE token (no TYPE, no pointer, no tag, no
    // trailing macro word) is not by itself a type.
    if count == 1 && last_was_type_flagged && pointer_depth == 0 && tag_ident.is_none() {
        let attrs = cursor.data(start).attrs;
        if attrs.intersects(AttrFlags::QUALIFIER | AttrFlags::STORAGE) && !attrs.contains(AttrFlags::TYPE) {
            return None;
        }
    }

    Some(TypePhrase {
        start,
        end,
        tag_ident,
        pointer_depth,
        is_function_pointer: false,
    })
}

/// Whether the token right after the `(` (not yet consumed) currently
/// under the cursor is `*` — used to decide whether an IDENT's trailing
/// `(` is a function-pointer argument list rather than a call-like form
/// that ends the type.
fn peeks_star_after_lparen(cursor: &mut Cursor) -> bool {
    let saved = cursor.state();
    let matched = cursor.pop().ok().is_some() && cursor.peek_if(TokenKind::Star);
    cursor.restore(saved);
    matched
}

/// The function-pointer declarator form: `( * ident? []? ) ( … )`. The
/// opening paren of the type is annotated [`InstFlags::TYPE_ARGS`] per
/// §4.5; the closing paren of the argument list is annotated
/// [`InstFlags::TYPE_FUNC`].
fn try_function_pointer(cursor: &mut Cursor) -> Option<TypePhrase> {
    let save = cursor.state();

    let open = cursor.pop().ok()?;
    if cursor.data(open).kind != TokenKind::LParen {
        cursor.restore(save);
        return None;
    }
    if !cursor.peek_if(TokenKind::Star) {
        cursor.restore(save);
        return None;
    }
    cursor.pop().ok()?;

    let mut tag_ident = None;
    if cursor.peek_if(TokenKind::Ident) {
        tag_ident = cursor.pop().ok();
    }
    if cursor.peek_if(TokenKind::LBracket) {
        if cursor.if_pair(TokenKind::LBracket, TokenKind::RBracket).is_none() {
            cursor.restore(save);
            return None;
        }
    }

    match cursor.pop() {
        Ok(id) if cursor.data(id).kind == TokenKind::RParen => {}
        _ => {
            cursor.restore(save);
            return None;
        }
    }

    if !cursor.peek_if(TokenKind::LParen) {
        cursor.restore(save);
        return None;
    }
    let args_open = cursor.pop().ok()?;
    cursor.mark_flag(args_open, InstFlags::TYPE_ARGS);

    let Some(args_close) = skip_balanced_after_open(cursor) else {
        cursor.restore(save);
        return None;
    };
    cursor.mark_flag(args_close, InstFlags::TYPE_FUNC);

    Some(TypePhrase {
        start: open,
        end: args_close,
        tag_ident,
        pointer_depth: 1,
        is_function_pointer: true,
    })
}

/// Consume tokens until the `)` balancing an already-consumed `(`.
fn skip_balanced_after_open(cursor: &mut Cursor) -> Option<TokenId> {
    let mut depth = 1u32;
    loop {
        let id = cursor.pop().ok()?;
        match cursor.data(id).kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(id);
                }
            }
            TokenKind::Eof => return None,
            _ => {}
        }
    }
}
