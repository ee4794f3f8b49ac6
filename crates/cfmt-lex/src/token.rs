//! Token model: kinds, attribute/instance flags, and the arena that owns them.
//!
//! A C source file tokenizes into two kinds of token: *main-stream* tokens
//! (keywords, punctuators, identifiers, literals, `EOF`/`ERROR`) that the
//! parser walks via the [`crate::cursor::Cursor`], and *dangling* tokens
//! (comments, preprocessor directives, the blank-line marker) that never
//! appear in the main stream and are only ever reachable through another
//! token's [`TokenData::prefixes`]/[`TokenData::suffixes`].

use cfmt_util::define_idx;
use cfmt_util::index_vec::IndexVec;

/// Helper macro producing a small `Copy` bitset newtype with `const`
/// members, `contains`/`union`/`Default`, matching the attribute-flag
/// tables the keyword/punctuator descriptors are built from. Hand-rolled
/// rather than pulled in from a crate: the set is small, fixed at compile
/// time, and checked on every classifier step.
macro_rules! bitflags_like {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $repr:ty {
            $(
                $(#[$fmeta:meta])*
                const $flag:ident = $value:expr;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name($repr);

        impl $name {
            $(
                $(#[$fmeta])*
                pub const $flag: Self = Self($value);
            )*

            /// The empty set.
            pub const NONE: Self = Self(0);

            /// Combine two flag sets.
            #[inline]
            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            /// Whether `self` contains every bit set in `other`.
            #[inline]
            pub const fn contains(self, other: Self) -> bool {
                (self.0 & other.0) == other.0 && other.0 != 0
            }

            /// Whether `self` shares any bit with `other`.
            #[inline]
            pub const fn intersects(self, other: Self) -> bool {
                (self.0 & other.0) != 0
            }

            /// Set `other`'s bits, returning the updated set.
            #[inline]
            pub const fn with(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            /// Clear `other`'s bits, returning the updated set.
            #[inline]
            pub const fn without(self, other: Self) -> Self {
                Self(self.0 & !other.0)
            }

            /// Whether this is the empty set.
            #[inline]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }
    };
}

/// Stable reference to a token inside a [`TokenArena`].
///
/// Branch links and stream linkage are expressed as `Option<TokenId>`
/// rather than pointers, so the arena can be freed in bulk and a branch
/// chain is just a handful of integers.
define_idx!(TokenId);

bitflags_like! {
    /// Attribute flags carried by every keyword/punctuator template in the
    /// keyword table (see [`crate::keyword`]). These describe what kind of
    /// thing the lexeme *is*, independent of any one instance of it.
    pub struct AttrFlags: u16 {
        /// A type-name keyword (`int`, `char`, `void`, ...).
        const TYPE      = 1 << 0;
        /// A type qualifier (`const`, `volatile`).
        const QUALIFIER = 1 << 1;
        /// A storage-class specifier (`static`, `extern`, `typedef`, ...).
        const STORAGE   = 1 << 2;
        /// May be followed by an identifier naming a tag (`struct`, `enum`,
        /// `union`).
        const IDENT     = 1 << 3;
        /// Lexeme is a strict prefix of a longer valid lexeme (`<` of
        /// `<=`/`<<`/`<<=`) and must be probed for extension.
        const AMBIGUOUS = 1 << 4;
        /// A binary operator punctuator.
        const BINARY    = 1 << 5;
        /// An assignment-kind punctuator (`=`, `+=`, `<<=`, ...).
        const ASSIGN    = 1 << 6;
        /// Matched but never emitted as a token (backslash line
        /// continuation).
        const DISCARD   = 1 << 7;
    }
}

bitflags_like! {
    /// Per-instance flags set on a concrete [`TokenData`], independent of
    /// what the keyword table says about its kind.
    pub struct InstFlags: u16 {
        /// Trivia token: never inserted into the main stream, only held in
        /// a prefix/suffix sub-list.
        const DANGLING  = 1 << 0;
        /// Synthesized token with no corresponding source bytes.
        const FAKE      = 1 << 1;
        /// Not owned by the arena's stream linkage (reserved for document
        /// IR bookkeeping downstream; never set by the lexer itself).
        const FREE      = 1 << 2;
        /// Set on a branch anchor when a branch has just been taken, so the
        /// document engine knows to resume normal output after it.
        const UNMUTE    = 1 << 3;
        /// This token's lexeme itself is a run of newline bytes (used
        /// internally by the blank-line marker).
        const NEWLINE   = 1 << 4;
        /// Classifier annotation: this `(` opens a function-pointer
        /// argument list recognized by the type-phrase heuristic.
        const TYPE_ARGS = 1 << 5;
        /// Classifier annotation: this token closes a function-type
        /// phrase.
        const TYPE_FUNC = 1 << 6;
    }
}

/// The closed set of token kinds the lexer ever produces.
///
/// Keywords and punctuators are listed individually (rather than carrying
/// the lexeme as data) because the parser dispatches on kind constantly and
/// a flat `match` over named variants reads far better than comparing
/// interned strings. Sentinels (`Eof`, `Error`, `Ident`, ...) close out the
/// set for everything that isn't a fixed spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,

    // Punctuators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Colon,
    Dot,
    Ellipsis,
    Arrow,
    Question,
    Tilde,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Bang,
    Lt,
    Gt,
    Eq,
    PlusPlus,
    MinusMinus,
    Shl,
    Shr,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    AmpAmp,
    PipePipe,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    Backslash, // DISCARD: line continuation, never emitted as a real token

    // Sentinels
    Comment,
    Cpp,
    CppIf,
    CppElse,
    CppEndif,
    Eof,
    Error,
    Ident,
    Literal,
    String,
    Space,
    Unknown,
    None,
}

impl TokenKind {
    /// Whether this kind denotes a trivia-only sentinel that is always
    /// DANGLING wherever it appears.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Comment
                | TokenKind::Cpp
                | TokenKind::CppIf
                | TokenKind::CppElse
                | TokenKind::CppEndif
                | TokenKind::Space
        )
    }

    /// Whether this kind participates in `#if`/`#else`/`#endif` branch
    /// linking when it appears on a prefix list.
    pub fn is_branch_anchor(self) -> bool {
        matches!(
            self,
            TokenKind::CppIf | TokenKind::CppElse | TokenKind::CppEndif
        )
    }
}

/// Disambiguates the shapes the original's half-linked branch state (only
/// one pointer set) used to conflate: resolves the §9 open question by
/// giving each branch anchor an explicit state instead of inferring which
/// case applies from which pointer happens to be null.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BranchState {
    /// Not part of any `#if`/`#else`/`#endif` chain.
    #[default]
    Unlinked,
    /// First arm of a chain (`#if`): only a later alternative is known.
    Head { next: TokenId },
    /// Fully-linked interior alternative: both neighbors present. This is
    /// the only shape `pop` halts on.
    Linked { prev: TokenId, next: TokenId },
    /// Half-linked, last-in-chain alternative (`#endif`'s arm) that has
    /// not been taken.
    Terminal { prev: TokenId },
    /// A fully-linked alternative whose branch has already been taken by
    /// the cursor's recovery machinery; `prev` was cleared in the process,
    /// distinguishing it from a fresh [`BranchState::Head`] even though
    /// both shapes retain only a `next` link.
    Taken { next: Option<TokenId> },
}

impl BranchState {
    /// A branch anchor is "fully-linked" per §4.4 when both a previous and
    /// a next alternative are known — this is the state `pop` halts on.
    pub fn is_fully_linked(self) -> bool {
        matches!(self, BranchState::Linked { .. })
    }

    pub fn prev(self) -> Option<TokenId> {
        match self {
            BranchState::Linked { prev, .. } => Some(prev),
            BranchState::Terminal { prev } => Some(prev),
            BranchState::Unlinked | BranchState::Head { .. } | BranchState::Taken { .. } => None,
        }
    }

    pub fn next(self) -> Option<TokenId> {
        match self {
            BranchState::Linked { next, .. } => Some(next),
            BranchState::Head { next } => Some(next),
            BranchState::Taken { next } => next,
            BranchState::Unlinked | BranchState::Terminal { .. } => None,
        }
    }
}

/// One token: its kind, source position, lexeme slice, flags, trivia
/// sub-lists, branch link, and stream linkage.
#[derive(Clone, Debug)]
pub struct TokenData {
    pub kind: TokenKind,
    /// 1-based line of the first byte of the lexeme.
    pub line: u32,
    /// 1-based column of the first byte of the lexeme.
    pub column: u32,
    /// Byte offset into the owning [`crate::buffer::Buffer`].
    pub offset: usize,
    /// Byte length of the lexeme.
    pub len: usize,
    pub attrs: AttrFlags,
    pub inst: InstFlags,
    /// Dangling trivia tokens attached before this token.
    pub prefixes: Vec<TokenId>,
    /// Dangling trivia tokens attached after this token.
    pub suffixes: Vec<TokenId>,
    pub branch: BranchState,
    /// Previous non-dangling token in source order, if any.
    pub prev: Option<TokenId>,
    /// Next non-dangling token in source order, if any.
    pub next: Option<TokenId>,
}

impl TokenData {
    pub fn is_dangling(&self) -> bool {
        self.inst.contains(InstFlags::DANGLING)
    }
}

/// Owns every [`TokenData`] produced for one translation unit, including
/// the DANGLING ones reachable only via a prefix/suffix list.
///
/// Implemented as an [`IndexVec`] rather than a doubly-linked list of
/// owned nodes: branch links and stream linkage become small `Copy`
/// indices, and the whole arena (and every token it transitively owns) is
/// freed in one deallocation when it is dropped.
#[derive(Clone, Debug, Default)]
pub struct TokenArena {
    tokens: IndexVec<TokenId, TokenData>,
}

impl TokenArena {
    pub fn new() -> Self {
        Self {
            tokens: IndexVec::new(),
        }
    }

    pub fn push(&mut self, token: TokenData) -> TokenId {
        self.tokens.push(token)
    }

    pub fn get(&self, id: TokenId) -> &TokenData {
        self.tokens
            .get(id)
            .expect("TokenId must refer to a live token in this arena")
    }

    pub fn get_mut(&mut self, id: TokenId) -> &mut TokenData {
        self.tokens
            .get_mut(id)
            .expect("TokenId must refer to a live token in this arena")
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter_ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.tokens.indices()
    }
}
