//! Adapts tree-sitter nodes to the core [`SyntaxNode`] capability

use tendril_core::SyntaxNode;
use tree_sitter::Node;

/// A tree-sitter node paired with the source it was parsed from.
#[derive(Debug, Clone, Copy)]
pub struct TsNode<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> TsNode<'a> {
    pub fn new(node: Node<'a>, source: &'a str) -> Self {
        Self { node, source }
    }

    pub fn source_text(&self) -> &'a str {
        self.source.get(self.node.byte_range()).unwrap_or("")
    }

    /// 1-based start line.
    pub fn line(&self) -> u32 {
        self.node.start_position().row as u32 + 1
    }

    pub fn field(&self, name: &str) -> Option<Self> {
        self.node
            .child_by_field_name(name)
            .map(|node| Self::new(node, self.source))
    }

    pub fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|node| Self::new(node, self.source))
            .collect()
    }

    /// First direct child of the given kind, named or anonymous.
    pub fn child_of_kind(&self, kind: &str) -> Option<Self> {
        self.children().into_iter().find(|c| c.node.kind() == kind)
    }

    pub fn has_child_kind(&self, kind: &str) -> bool {
        self.child_of_kind(kind).is_some()
    }
}

impl SyntaxNode for TsNode<'_> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn text(&self) -> &str {
        self.source_text()
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|node| Self::new(node, self.source))
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.node.parent().map(|node| Self::new(node, self.source))
    }

    fn is_trivia(&self) -> bool {
        self.node.is_extra() || self.node.kind().ends_with("comment")
    }

    fn is_import_declaration(&self) -> bool {
        self.node.kind() == "import_statement"
    }

    fn is_literal_content(&self) -> bool {
        self.node.kind() == "string_fragment"
    }
}
