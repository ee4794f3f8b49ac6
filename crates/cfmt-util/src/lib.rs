//! cfmt-util - core utilities shared by every stage of the formatter.
//!
//! This crate carries the ambient infrastructure the rest of the workspace
//! builds on: string interning ([`symbol`]), diagnostic reporting
//! ([`diagnostic`]), source location tracking ([`span`]), typed-index
//! vectors ([`index_vec`]) and the error enums used throughout.
//!
//! None of these types know anything about C syntax. The token model and
//! lexer live in `cfmt-lex`; this crate only provides the foundation they're
//! built on.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level, SourceSnippet};
pub use error::{
    DiagnosticError, DiagnosticResult, IndexVecError, IndexVecResult, SourceMapError,
    SourceMapResult, SymbolError, SymbolResult,
};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::{InternerStats, Symbol};

pub use rustc_hash::{FxHashMap, FxHashSet};
