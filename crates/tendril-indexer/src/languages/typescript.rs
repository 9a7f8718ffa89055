//! TypeScript and TSX extractor

use std::path::Path;

use super::ecmascript;
use crate::extractor::{ExtractionResult, IndexError, LanguageExtractor};
use crate::parser::FileType;

pub struct TypeScriptExtractor {
    file_type: FileType,
}

impl TypeScriptExtractor {
    pub fn new() -> Self {
        Self {
            file_type: FileType::TypeScript,
        }
    }

    pub fn tsx() -> Self {
        Self {
            file_type: FileType::Tsx,
        }
    }
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for TypeScriptExtractor {
    fn extract(&self, path: &Path, content: &str) -> Result<ExtractionResult, IndexError> {
        ecmascript::extract(path, content, self.file_type)
    }
}
