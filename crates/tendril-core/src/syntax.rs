//! Parser-independent view of a syntax tree
//!
//! The hasher and the occurrence scanner only need a handful of structural
//! queries. Implementing [`SyntaxNode`] for a parser's node type is enough
//! to plug that parser into the engine.

/// A node in some concrete syntax tree.
pub trait SyntaxNode: Clone {
    /// Grammar-specific node kind, used for diagnostics only.
    fn kind(&self) -> &str;

    /// Exact source text covered by this node.
    fn text(&self) -> &str;

    /// Direct children in source order, including anonymous tokens.
    fn children(&self) -> Vec<Self>;

    fn parent(&self) -> Option<Self>;

    /// Comments and other tokens that carry no meaning.
    fn is_trivia(&self) -> bool;

    /// Whether this node is an import declaration.
    fn is_import_declaration(&self) -> bool;

    /// Leaves holding the content of a string or template literal. Their
    /// whitespace is part of the value, so it is never trimmed.
    fn is_literal_content(&self) -> bool {
        false
    }

    /// Does any enclosing node satisfy `pred`?
    fn has_ancestor(&self, pred: impl Fn(&Self) -> bool) -> bool {
        let mut current = self.parent();
        while let Some(node) = current {
            if pred(&node) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Whether this position has an enclosing import declaration.
    fn within_import_declaration(&self) -> bool {
        self.has_ancestor(|n| n.is_import_declaration())
    }
}
