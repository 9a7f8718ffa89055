//! Test utilities for Tendril core

use crate::model::{FileSet, ImportBinding, ImportStatement, Occurrence, SourceFile};
use crate::syntax::SyntaxNode;

/// Shape of an in-memory syntax tree.
pub enum NodeSpec {
    Leaf(String),
    /// Content of a string or template literal.
    Literal(String),
    Trivia(String),
    Branch(String, Vec<NodeSpec>),
}

pub fn leaf(text: &str) -> NodeSpec {
    NodeSpec::Leaf(text.to_string())
}

pub fn literal(text: &str) -> NodeSpec {
    NodeSpec::Literal(text.to_string())
}

pub fn trivia(text: &str) -> NodeSpec {
    NodeSpec::Trivia(text.to_string())
}

pub fn branch(kind: &str, children: Vec<NodeSpec>) -> NodeSpec {
    NodeSpec::Branch(kind.to_string(), children)
}

struct NodeData {
    kind: String,
    text: String,
    children: Vec<usize>,
    parent: Option<usize>,
    trivia: bool,
}

/// Arena-backed tree implementing [`SyntaxNode`] without a real parser.
pub struct TestTree {
    nodes: Vec<NodeData>,
}

impl TestTree {
    pub fn new(spec: NodeSpec) -> Self {
        let mut tree = TestTree { nodes: Vec::new() };
        tree.add(spec, None);
        tree
    }

    fn add(&mut self, spec: NodeSpec, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        let (kind, text, trivia, children) = match spec {
            NodeSpec::Leaf(text) => ("token".to_string(), text, false, Vec::new()),
            NodeSpec::Literal(text) => ("string_fragment".to_string(), text, false, Vec::new()),
            NodeSpec::Trivia(text) => ("comment".to_string(), text, true, Vec::new()),
            NodeSpec::Branch(kind, children) => (kind, String::new(), false, children),
        };
        self.nodes.push(NodeData {
            kind,
            text,
            children: Vec::new(),
            parent,
            trivia,
        });

        let mut child_ids = Vec::new();
        for child in children {
            child_ids.push(self.add(child, Some(idx)));
        }
        if !child_ids.is_empty() {
            let text = child_ids
                .iter()
                .map(|&c| self.nodes[c].text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            self.nodes[idx].text = text;
        }
        self.nodes[idx].children = child_ids;
        idx
    }

    pub fn root(&self) -> TestNode<'_> {
        TestNode { tree: self, idx: 0 }
    }

    /// First leaf whose text is `text`, in source order.
    pub fn find_leaf(&self, text: &str) -> Option<TestNode<'_>> {
        self.nodes
            .iter()
            .position(|n| n.children.is_empty() && n.text == text)
            .map(|idx| TestNode { tree: self, idx })
    }
}

#[derive(Clone, Copy)]
pub struct TestNode<'a> {
    tree: &'a TestTree,
    idx: usize,
}

impl<'a> TestNode<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.idx]
    }
}

impl SyntaxNode for TestNode<'_> {
    fn kind(&self) -> &str {
        &self.data().kind
    }

    fn text(&self) -> &str {
        &self.data().text
    }

    fn children(&self) -> Vec<Self> {
        self.data()
            .children
            .iter()
            .map(|&idx| TestNode { tree: self.tree, idx })
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|idx| TestNode { tree: self.tree, idx })
    }

    fn is_trivia(&self) -> bool {
        self.data().trivia
    }

    fn is_import_declaration(&self) -> bool {
        self.data().kind == "import_declaration"
    }

    fn is_literal_content(&self) -> bool {
        self.data().kind == "string_fragment"
    }
}

pub fn occurrence(text: &str, line: u32) -> Occurrence {
    Occurrence {
        text: text.to_string(),
        line,
        in_import: false,
    }
}

pub fn import_occurrence(text: &str, line: u32) -> Occurrence {
    Occurrence {
        text: text.to_string(),
        line,
        in_import: true,
    }
}

/// `fileA` defines Button, `fileB` uses it on lines 10 and 22, `fileC` is a
/// barrel re-exporting it.
pub fn button_file_set() -> FileSet {
    let mut files = FileSet::new();
    files.insert(SourceFile::new("/repo/src/components/Button.tsx"));

    let mut app = SourceFile::new("/repo/src/App.tsx");
    app.imports.push(ImportStatement {
        specifier: "./components/Button".to_string(),
        bindings: vec![ImportBinding::named("Button")],
        line: 1,
    });
    app.occurrences = vec![
        import_occurrence("Button", 1),
        occurrence("App", 3),
        occurrence("Button", 10),
        occurrence("Button", 22),
        occurrence("Button", 22),
        occurrence("onClick", 22),
    ];
    files.insert(app);

    let mut barrel = SourceFile::new("/repo/src/components/index.ts");
    barrel.imports.push(ImportStatement {
        specifier: "./Button".to_string(),
        bindings: vec![ImportBinding::named("Button")],
        line: 1,
    });
    barrel.occurrences = vec![import_occurrence("Button", 1), occurrence("Button", 3)];
    files.insert(barrel);

    files
}
