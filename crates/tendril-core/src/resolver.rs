//! Relative module specifier resolution against the known file set

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::model::{FileId, FileSet};

/// Extensions tried, in order, after the bare joined path.
pub const EXTENSIONS: [&str; 4] = [".ts", ".tsx", ".js", ".jsx"];

/// Directory index files tried after the extensions.
pub const INDEX_FILES: [&str; 4] = ["index.ts", "index.tsx", "index.js", "index.jsx"];

/// Resolves relative specifiers to files already present in a [`FileSet`].
///
/// Never touches the filesystem: a candidate matches only if the file set
/// contains it.
pub struct ImportResolver<'a> {
    files: &'a FileSet,
}

impl<'a> ImportResolver<'a> {
    pub fn new(files: &'a FileSet) -> Self {
        Self { files }
    }

    /// Resolve `specifier` as written in `from`. Bare and aliased
    /// specifiers (`react`, `@/components`) are never resolved.
    pub fn resolve(&self, specifier: &str, from: &Path) -> Option<FileId> {
        if !is_relative(specifier) {
            return None;
        }
        let base = from.parent().unwrap_or_else(|| Path::new(""));
        let joined = normalize(&base.join(specifier));

        candidates(&joined, specifier)
            .into_iter()
            .find_map(|candidate| self.files.id_of(&candidate))
    }
}

pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn candidates(joined: &Path, specifier: &str) -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(1 + EXTENSIONS.len() + INDEX_FILES.len() + 2);
    out.push(joined.to_path_buf());
    out.extend(EXTENSIONS.iter().map(|ext| with_suffix(joined, ext)));
    out.extend(INDEX_FILES.iter().map(|index| joined.join(index)));

    // `./button.js` written against a `button.ts` source (ESM style)
    if specifier.ends_with(".js") || specifier.ends_with(".jsx") {
        out.push(joined.with_extension("ts"));
        out.push(joined.with_extension("tsx"));
    }
    out
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Fold `.` and `..` components without consulting the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}
