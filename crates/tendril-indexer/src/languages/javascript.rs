//! JavaScript and JSX extractor

use std::path::Path;

use super::ecmascript;
use crate::extractor::{ExtractionResult, IndexError, LanguageExtractor};
use crate::parser::FileType;

pub struct JavaScriptExtractor;

impl LanguageExtractor for JavaScriptExtractor {
    fn extract(&self, path: &Path, content: &str) -> Result<ExtractionResult, IndexError> {
        ecmascript::extract(path, content, FileType::JavaScript)
    }
}
