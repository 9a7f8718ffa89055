//! Tree-sitter parsing for the supported file types
//!
//! Tree-sitter parsers are not `Sync`, so every worker thread keeps its own
//! parser in a thread-local and only switches its language per request.

use std::cell::RefCell;
use std::path::Path;

use tree_sitter::{Language, Parser, Tree};

/// Supported file types for parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    TypeScript,
    Tsx,
    JavaScript,
}

impl FileType {
    /// Determine file type from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "ts" | "mts" | "cts" => Some(FileType::TypeScript),
            "tsx" => Some(FileType::Tsx),
            "js" | "jsx" | "mjs" | "cjs" => Some(FileType::JavaScript),
            _ => None,
        }
    }

    /// Get the tree-sitter language for this file type
    pub fn language(&self) -> Language {
        match self {
            FileType::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            FileType::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            FileType::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileType::TypeScript => "typescript",
            FileType::Tsx => "tsx",
            FileType::JavaScript => "javascript",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to set {language} grammar: {source}")]
    Language {
        language: &'static str,
        source: tree_sitter::LanguageError,
    },
    #[error("parser produced no tree")]
    NoTree,
}

thread_local! {
    static PARSER: RefCell<Parser> = RefCell::new(Parser::new());
}

/// Parse `content` on the calling thread's parser.
pub fn parse(file_type: FileType, content: &str) -> Result<Tree, ParseError> {
    PARSER.with(|parser| {
        let mut parser = parser.borrow_mut();
        parser
            .set_language(&file_type.language())
            .map_err(|source| ParseError::Language {
                language: file_type.name(),
                source,
            })?;
        parser.parse(content, None).ok_or(ParseError::NoTree)
    })
}
