//! Core data structures shared by the index, the hasher and the cache

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Stable arena index of a file inside a [`FileSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What an import binding refers to in the target module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportedName {
    /// `import Button from './Button'`
    Default,
    /// `import { Button }` or `import { Button as B }`
    Named(String),
}

/// A single name bound by an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBinding {
    /// Name the importing file uses.
    pub local: String,
    pub imported: ImportedName,
}

impl ImportBinding {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        ImportBinding {
            local: name.clone(),
            imported: ImportedName::Named(name),
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        ImportBinding {
            local: alias.into(),
            imported: ImportedName::Named(name.into()),
        }
    }

    pub fn default_import(local: impl Into<String>) -> Self {
        ImportBinding {
            local: local.into(),
            imported: ImportedName::Default,
        }
    }
}

/// One `import ... from '<specifier>'` statement of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    pub specifier: String,
    pub bindings: Vec<ImportBinding>,
    pub line: u32,
}

/// One identifier token in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub text: String,
    /// 1-based line number.
    pub line: u32,
    /// True when the token sits inside an import declaration.
    pub in_import: bool,
}

/// The parsed view of one source file that the usage index consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Canonical absolute path; doubles as the file's identity.
    pub path: PathBuf,
    pub imports: Vec<ImportStatement>,
    pub occurrences: Vec<Occurrence>,
    /// Declared name behind `export default`, when there is one.
    pub default_export: Option<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SourceFile {
            path: path.into(),
            imports: Vec::new(),
            occurrences: Vec::new(),
            default_export: None,
        }
    }
}

/// Arena of every successfully parsed file in the current run.
#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, FileId>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, returning its id. Re-inserting a known path replaces
    /// the previous entry and keeps its id.
    pub fn insert(&mut self, file: SourceFile) -> FileId {
        if let Some(&id) = self.by_path.get(&file.path) {
            self.files[id.index()] = file;
            return id;
        }
        let id = FileId(self.files.len() as u32);
        self.by_path.insert(file.path.clone(), id);
        self.files.push(file);
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    pub fn id_of(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(path).copied()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId(i as u32), f))
    }

    pub fn as_slice(&self) -> &[SourceFile] {
        &self.files
    }
}

/// Identity of an exported declaration: where it is defined and its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub file: PathBuf,
    pub name: String,
}

impl EntityKey {
    pub fn new(file: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        EntityKey {
            file: file.into(),
            name: name.into(),
        }
    }

    /// Key under which the entity is stored in the persisted cache.
    /// Paths under `root` are stored relative to it so the cache survives
    /// moving the checkout.
    pub fn cache_key(&self, root: &Path) -> String {
        let file = self.file.strip_prefix(root).unwrap_or(&self.file);
        format!("{}:{}", file.display(), self.name)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.name)
    }
}

/// A location reading an entity's bound name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageReference {
    pub file: PathBuf,
    pub line: u32,
}

impl UsageReference {
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        UsageReference {
            file: file.into(),
            line,
        }
    }
}

// Byte-wise path order, not component order, then ascending line.
impl Ord for UsageReference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file
            .as_os_str()
            .cmp(other.file.as_os_str())
            .then(self.line.cmp(&other.line))
    }
}

impl PartialOrd for UsageReference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Implementation and interface fingerprints of one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashPair {
    pub implementation_hash: String,
    pub interface_hash: String,
}

impl HashPair {
    pub fn new(implementation_hash: impl Into<String>, interface_hash: impl Into<String>) -> Self {
        HashPair {
            implementation_hash: implementation_hash.into(),
            interface_hash: interface_hash.into(),
        }
    }
}

/// Discriminates what kind of declaration an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Function,
    Class,
    Interface,
    TypeAlias,
    Enum,
    Variable,
}

/// An entity whose syntax has already been reduced to owned data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: EntityKey,
    pub kind: EntityKind,
    /// 1-based line of the declaration.
    pub line: u32,
    pub signature: String,
    pub hashes: HashPair,
}

/// Everything downstream writers need to know about one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityReport {
    pub key: EntityKey,
    pub kind: EntityKind,
    pub line: u32,
    pub signature: String,
    pub hashes: HashPair,
    pub usages: Vec<UsageReference>,
    pub needs_regeneration: bool,
}
