//! `cfmt-doc` — the document IR's shape.
//!
//! Layout is out of scope here (§1): this crate gives the parser and
//! ruler collaborators a tree to build and a pair of entry points
//! (`doc_exec`/`doc_width`) an execution engine downstream would fulfill.
//! No rendering or width measurement happens in this crate.

use bumpalo::Bump;

/// A document node's shape. `Line`/`Softline`/`Hardline` are the three
/// line-break strengths a renderer would choose between when a `Group`
/// doesn't fit; `Mute` marks a subtree that should be dropped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocType {
    Concat,
    Group,
    Indent,
    Dedent,
    Align,
    Literal,
    Verbatim,
    Line,
    Softline,
    Hardline,
    Newline,
    Mute,
}

/// No indent change at a `Dedent` node.
pub const DEDENT_NONE: i32 = 0;
/// Indent to the column just inside an open paren, rather than by a fixed
/// tab-width step.
pub const INDENT_PARENS: i32 = -1;
/// Always take the indent, even inside a `Group` that fit on one line.
pub const INDENT_FORCE: i32 = -2;

/// One node of the document tree. Children live in the arena a [`DocArena`]
/// owns; a `Doc` only ever borrows out of it.
#[derive(Debug, Clone, Copy)]
pub struct Doc<'a> {
    pub kind: DocType,
    pub text: Option<&'a str>,
    pub indent: i32,
    pub children: &'a [Doc<'a>],
}

/// Owns the arena every [`Doc`] in one document is allocated out of.
pub struct DocArena {
    bump: Bump,
}

impl DocArena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Allocate a node with the given children, already built.
    pub fn doc_alloc<'a>(&'a self, kind: DocType, children: &[Doc<'a>]) -> &'a Doc<'a> {
        let children = self.bump.alloc_slice_copy(children);
        self.bump.alloc(Doc {
            kind,
            text: None,
            indent: DEDENT_NONE,
            children,
        })
    }

    /// Allocate an `Indent`/`Dedent` node carrying an explicit indent
    /// delta (or one of [`INDENT_PARENS`]/[`INDENT_FORCE`]).
    pub fn doc_alloc_indent<'a>(&'a self, kind: DocType, indent: i32, children: &[Doc<'a>]) -> &'a Doc<'a> {
        let children = self.bump.alloc_slice_copy(children);
        self.bump.alloc(Doc {
            kind,
            text: None,
            indent,
            children,
        })
    }

    /// A `Literal` leaf: text the renderer copies through unchanged.
    pub fn doc_literal<'a>(&'a self, text: &str) -> &'a Doc<'a> {
        let text = self.bump.alloc_str(text);
        self.bump.alloc(Doc {
            kind: DocType::Literal,
            text: Some(text),
            indent: DEDENT_NONE,
            children: &[],
        })
    }

    /// A `Verbatim` leaf: source text to pass through with no layout
    /// reasoning applied at all (the region between an unbalanced comment
    /// and its target).
    pub fn doc_token<'a>(&'a self, text: &str) -> &'a Doc<'a> {
        let text = self.bump.alloc_str(text);
        self.bump.alloc(Doc {
            kind: DocType::Verbatim,
            text: Some(text),
            indent: DEDENT_NONE,
            children: &[],
        })
    }

    /// Append one more child to a `Concat`/`Group`-shaped node, returning
    /// the new node (the arena holds only append-only slices, so this
    /// allocates a fresh one rather than mutating in place).
    pub fn doc_append<'a>(&'a self, doc: &Doc<'a>, child: Doc<'a>) -> &'a Doc<'a> {
        let mut children = Vec::with_capacity(doc.children.len() + 1);
        children.extend_from_slice(doc.children);
        children.push(child);
        let children = self.bump.alloc_slice_copy(&children);
        self.bump.alloc(Doc {
            kind: doc.kind,
            text: doc.text,
            indent: doc.indent,
            children,
        })
    }

    /// Drop the child at `index`, returning the new node.
    pub fn doc_remove<'a>(&'a self, doc: &Doc<'a>, index: usize) -> &'a Doc<'a> {
        let mut children: Vec<Doc<'a>> = doc.children.to_vec();
        if index < children.len() {
            children.remove(index);
        }
        let children = self.bump.alloc_slice_copy(&children);
        self.bump.alloc(Doc {
            kind: doc.kind,
            text: doc.text,
            indent: doc.indent,
            children,
        })
    }

    /// Drop the last child, returning the new node. A no-op on a childless
    /// node.
    pub fn doc_remove_tail<'a>(&'a self, doc: &Doc<'a>) -> &'a Doc<'a> {
        if doc.children.is_empty() {
            return self.bump.alloc(*doc);
        }
        self.doc_remove(doc, doc.children.len() - 1)
    }

    /// Return a copy of `doc` with `indent` replaced.
    pub fn doc_set_indent<'a>(&'a self, doc: &Doc<'a>, indent: i32) -> &'a Doc<'a> {
        self.bump.alloc(Doc {
            kind: doc.kind,
            text: doc.text,
            indent,
            children: doc.children,
        })
    }
}

impl Default for DocArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `doc` to a string no wider than `max_width` where a choice
/// exists. Left for the execution engine downstream of this crate.
pub fn doc_exec(_doc: &Doc<'_>, _max_width: u32) -> String {
    unimplemented!("document execution is implemented downstream of cfmt-doc")
}

/// The column width `doc` would occupy if printed flat (no line breaks
/// taken). Left for the execution engine downstream of this crate.
pub fn doc_width(_doc: &Doc<'_>) -> u32 {
    unimplemented!("width measurement is implemented downstream of cfmt-doc")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_alloc_builds_a_group_over_two_literals() {
        let arena = DocArena::new();
        let a = arena.doc_literal("int");
        let b = arena.doc_literal("x");
        let group = arena.doc_alloc(DocType::Group, &[*a, *b]);
        assert_eq!(group.kind, DocType::Group);
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.children[0].text, Some("int"));
    }

    #[test]
    fn doc_append_grows_children_without_mutating_the_original() {
        let arena = DocArena::new();
        let concat = arena.doc_alloc(DocType::Concat, &[]);
        let grown = arena.doc_append(concat, *arena.doc_literal("x"));
        assert_eq!(concat.children.len(), 0);
        assert_eq!(grown.children.len(), 1);
    }

    #[test]
    fn doc_set_indent_preserves_kind_and_children() {
        let arena = DocArena::new();
        let indented = arena.doc_alloc_indent(DocType::Indent, DEDENT_NONE, &[*arena.doc_literal("x")]);
        let forced = arena.doc_set_indent(indented, INDENT_FORCE);
        assert_eq!(forced.indent, INDENT_FORCE);
        assert_eq!(forced.children.len(), 1);
    }

    #[test]
    #[should_panic]
    fn doc_exec_is_not_implemented_here() {
        let arena = DocArena::new();
        let doc = arena.doc_literal("x");
        doc_exec(doc, 80);
    }
}
