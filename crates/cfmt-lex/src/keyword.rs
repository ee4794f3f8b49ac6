//! Process-wide keyword/punctuator table.
//!
//! Built once from a `const` descriptor array and cached behind a
//! [`OnceLock`], the same lazily-initialized, never-mutated process-wide
//! singleton shape used elsewhere for tables like this one. Read-only
//! after first use, so concurrent reads need no further synchronization.

use std::sync::OnceLock;

use cfmt_util::FxHashMap;

use crate::token::{AttrFlags, TokenKind};

/// The canonical kind + attribute flags a lexeme maps to. Classifier
/// instances are stamped out of a template plus per-instance position and
/// flag data (see [`crate::token::TokenData`]).
#[derive(Clone, Copy, Debug)]
pub struct TokenTemplate {
    pub kind: TokenKind,
    pub attrs: AttrFlags,
}

impl TokenTemplate {
    const fn new(kind: TokenKind, attrs: AttrFlags) -> Self {
        Self { kind, attrs }
    }
}

macro_rules! attrs {
    () => { AttrFlags::NONE };
    ($first:ident $(| $rest:ident)*) => {
        AttrFlags::$first $(.union(AttrFlags::$rest))*
    };
}

/// `(lexeme, kind, attribute flags)` for every keyword and punctuator this
/// lexer recognizes. The same table backs both: the classifier's
/// single-byte punctuator probe (§4.2 step 4) only ever matches entries
/// whose lexeme is one byte, and no keyword is that short, so one map
/// naturally serves the two lookup styles (exact multi-byte probe for
/// punctuators, exact-word lookup after scanning an identifier for
/// keywords) without ambiguity.
const DESCRIPTORS: &[(&str, TokenKind, AttrFlags)] = &[
    // --- storage-class specifiers ---
    ("extern", TokenKind::Extern, attrs!(STORAGE)),
    ("inline", TokenKind::Inline, attrs!(STORAGE)),
    ("register", TokenKind::Register, attrs!(STORAGE)),
    ("static", TokenKind::Static, attrs!(STORAGE)),
    ("typedef", TokenKind::Typedef, attrs!(STORAGE)),
    // --- type qualifiers ---
    ("const", TokenKind::Const, attrs!(QUALIFIER)),
    ("volatile", TokenKind::Volatile, attrs!(QUALIFIER)),
    // --- type-name keywords ---
    ("char", TokenKind::Char, attrs!(TYPE)),
    ("double", TokenKind::Double, attrs!(TYPE)),
    ("float", TokenKind::Float, attrs!(TYPE)),
    ("int", TokenKind::Int, attrs!(TYPE)),
    ("long", TokenKind::Long, attrs!(TYPE)),
    ("short", TokenKind::Short, attrs!(TYPE)),
    ("signed", TokenKind::Signed, attrs!(TYPE)),
    ("unsigned", TokenKind::Unsigned, attrs!(TYPE)),
    ("void", TokenKind::Void, attrs!(TYPE)),
    // --- tag keywords: may be followed by an identifier naming the tag ---
    ("struct", TokenKind::Struct, attrs!(TYPE | IDENT)),
    ("union", TokenKind::Union, attrs!(TYPE | IDENT)),
    ("enum", TokenKind::Enum, attrs!(TYPE | IDENT)),
    // --- control-flow / other keywords ---
    ("break", TokenKind::Break, attrs!()),
    ("case", TokenKind::Case, attrs!()),
    ("continue", TokenKind::Continue, attrs!()),
    ("default", TokenKind::Default, attrs!()),
    ("do", TokenKind::Do, attrs!()),
    ("else", TokenKind::Else, attrs!()),
    ("for", TokenKind::For, attrs!()),
    ("goto", TokenKind::Goto, attrs!()),
    ("if", TokenKind::If, attrs!()),
    ("return", TokenKind::Return, attrs!()),
    ("sizeof", TokenKind::Sizeof, attrs!()),
    ("switch", TokenKind::Switch, attrs!()),
    ("while", TokenKind::While, attrs!()),
    // --- punctuators: single character, non-ambiguous ---
    ("(", TokenKind::LParen, attrs!()),
    (")", TokenKind::RParen, attrs!()),
    ("{", TokenKind::LBrace, attrs!()),
    ("}", TokenKind::RBrace, attrs!()),
    ("[", TokenKind::LBracket, attrs!()),
    ("]", TokenKind::RBracket, attrs!()),
    (";", TokenKind::Semi, attrs!()),
    (",", TokenKind::Comma, attrs!()),
    ("?", TokenKind::Question, attrs!()),
    ("~", TokenKind::Tilde, attrs!()),
    ("\\", TokenKind::Backslash, attrs!(DISCARD)),
    // --- punctuators: ambiguous, probed for extension ---
    (":", TokenKind::Colon, attrs!(AMBIGUOUS)),
    (".", TokenKind::Dot, attrs!(AMBIGUOUS)),
    ("+", TokenKind::Plus, attrs!(BINARY | AMBIGUOUS)),
    ("-", TokenKind::Minus, attrs!(BINARY | AMBIGUOUS)),
    ("*", TokenKind::Star, attrs!(BINARY | AMBIGUOUS)),
    ("/", TokenKind::Slash, attrs!(BINARY | AMBIGUOUS)),
    ("%", TokenKind::Percent, attrs!(BINARY | AMBIGUOUS)),
    ("&", TokenKind::Amp, attrs!(BINARY | AMBIGUOUS)),
    ("|", TokenKind::Pipe, attrs!(BINARY | AMBIGUOUS)),
    ("^", TokenKind::Caret, attrs!(BINARY | AMBIGUOUS)),
    ("!", TokenKind::Bang, attrs!(AMBIGUOUS)),
    ("<", TokenKind::Lt, attrs!(BINARY | AMBIGUOUS)),
    (">", TokenKind::Gt, attrs!(BINARY | AMBIGUOUS)),
    ("=", TokenKind::Eq, attrs!(ASSIGN | AMBIGUOUS)),
    // --- two/three-character extensions ---
    ("->", TokenKind::Arrow, attrs!()),
    ("++", TokenKind::PlusPlus, attrs!()),
    ("--", TokenKind::MinusMinus, attrs!()),
    ("<<", TokenKind::Shl, attrs!(BINARY | AMBIGUOUS)),
    (">>", TokenKind::Shr, attrs!(BINARY | AMBIGUOUS)),
    ("<=", TokenKind::LtEq, attrs!(BINARY)),
    (">=", TokenKind::GtEq, attrs!(BINARY)),
    ("==", TokenKind::EqEq, attrs!(BINARY)),
    ("!=", TokenKind::NotEq, attrs!(BINARY)),
    ("&&", TokenKind::AmpAmp, attrs!(BINARY)),
    ("||", TokenKind::PipePipe, attrs!(BINARY)),
    ("+=", TokenKind::PlusEq, attrs!(ASSIGN)),
    ("-=", TokenKind::MinusEq, attrs!(ASSIGN)),
    ("*=", TokenKind::StarEq, attrs!(ASSIGN)),
    ("/=", TokenKind::SlashEq, attrs!(ASSIGN)),
    ("%=", TokenKind::PercentEq, attrs!(ASSIGN)),
    ("&=", TokenKind::AmpEq, attrs!(ASSIGN)),
    ("|=", TokenKind::PipeEq, attrs!(ASSIGN)),
    ("^=", TokenKind::CaretEq, attrs!(ASSIGN)),
    ("<<=", TokenKind::ShlEq, attrs!(ASSIGN)),
    (">>=", TokenKind::ShrEq, attrs!(ASSIGN)),
];

/// Longest lexeme any descriptor has; bounds the ambiguous-punctuator
/// extension probe in the classifier.
pub const MAX_LEXEME_LEN: usize = 3;

static TABLE: OnceLock<FxHashMap<&'static str, TokenTemplate>> = OnceLock::new();

fn table() -> &'static FxHashMap<&'static str, TokenTemplate> {
    TABLE.get_or_init(|| {
        DESCRIPTORS
            .iter()
            .map(|&(lexeme, kind, attrs)| (lexeme, TokenTemplate::new(kind, attrs)))
            .collect()
    })
}

/// Exact lookup by lexeme bytes, used both for the classifier's
/// single-byte-then-extend punctuator probe and for the keyword check
/// performed after a whole identifier word has been scanned.
pub fn lookup(lexeme: &str) -> Option<TokenTemplate> {
    table().get(lexeme).copied()
}
