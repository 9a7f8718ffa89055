//! Language extractors for the supported ECMAScript dialects

pub mod ecmascript;
pub mod javascript;
pub mod typescript;

use std::path::Path;

use crate::extractor::{ExtractionResult, IndexError, LanguageExtractor};
use crate::parser::FileType;

/// Get the appropriate extractor for a file based on its extension
pub fn get_extractor(path: &Path) -> Option<Box<dyn LanguageExtractor>> {
    match FileType::from_path(path)? {
        FileType::TypeScript => Some(Box::new(typescript::TypeScriptExtractor::new())),
        FileType::Tsx => Some(Box::new(typescript::TypeScriptExtractor::tsx())),
        FileType::JavaScript => Some(Box::new(javascript::JavaScriptExtractor)),
    }
}

/// Read `path` from disk and run the matching extractor over it.
pub fn extract_file(path: &Path) -> Result<ExtractionResult, IndexError> {
    let extractor = get_extractor(path).ok_or_else(|| IndexError::Unsupported {
        path: path.to_path_buf(),
    })?;
    let bytes = std::fs::read(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| IndexError::NotUtf8 {
        path: path.to_path_buf(),
    })?;
    extractor.extract(path, &content)
}
