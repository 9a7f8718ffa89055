//! Unit tests for tendril-core

use crate::test_utils::*;
use crate::*;
use std::path::PathBuf;

const BUTTON: &str = "/repo/src/components/Button.tsx";
const APP: &str = "/repo/src/App.tsx";
const BARREL: &str = "/repo/src/components/index.ts";

fn barrels() -> BarrelMatcher {
    let root = std::path::Path::new("/repo");
    BarrelMatcher::new(&["**/index.ts", "**/index.tsx"], Some(root)).unwrap()
}

#[test]
fn test_button_scenario() {
    let files = button_file_set();
    let index = UsageIndex::build(&files, &barrels());

    let usages = index.usages(&EntityKey::new(BUTTON, "Button"));
    assert_eq!(
        usages,
        &[UsageReference::new(APP, 10), UsageReference::new(APP, 22)]
    );
}

#[test]
fn test_barrel_files_contribute_nothing() {
    let files = button_file_set();
    let index = UsageIndex::build(&files, &barrels());

    for key in index.keys() {
        assert!(index
            .usages(key)
            .iter()
            .all(|r| r.file != PathBuf::from(BARREL)));
    }

    // Without barrel patterns the same file does count.
    let open = UsageIndex::build(&files, &BarrelMatcher::empty());
    assert!(open
        .usages(&EntityKey::new(BUTTON, "Button"))
        .contains(&UsageReference::new(BARREL, 3)));
}

#[test]
fn test_index_never_points_at_definition_file() {
    let mut files = button_file_set();
    let mut button = SourceFile::new(BUTTON);
    button.imports.push(ImportStatement {
        specifier: "./Button".to_string(),
        bindings: vec![ImportBinding::named("Button")],
        line: 1,
    });
    button.occurrences = vec![occurrence("Button", 5)];
    files.insert(button);

    let index = UsageIndex::build(&files, &barrels());
    for key in index.keys() {
        assert!(index.usages(key).iter().all(|r| r.file != key.file));
    }
}

#[test]
fn test_aliased_import_keeps_canonical_key() {
    let mut files = FileSet::new();
    files.insert(SourceFile::new(BUTTON));

    let mut app = SourceFile::new(APP);
    app.imports.push(ImportStatement {
        specifier: "./components/Button".to_string(),
        bindings: vec![ImportBinding::aliased("Button", "B")],
        line: 1,
    });
    app.occurrences = vec![
        import_occurrence("Button", 1),
        import_occurrence("B", 1),
        occurrence("B", 4),
        occurrence("Button", 9),
    ];
    files.insert(app);

    let index = UsageIndex::build(&files, &BarrelMatcher::empty());
    assert_eq!(
        index.usages(&EntityKey::new(BUTTON, "Button")),
        &[UsageReference::new(APP, 4)]
    );
    assert!(index.usages(&EntityKey::new(BUTTON, "B")).is_empty());
}

#[test]
fn test_usages_sorted_across_files() {
    let mut files = FileSet::new();
    files.insert(SourceFile::new("/repo/lib/util.ts"));
    for (path, specifier, lines) in [
        ("/repo/z.ts", "./lib/util", vec![3, 1]),
        ("/repo/a-b.ts", "./lib/util", vec![9]),
        ("/repo/a/b.ts", "../lib/util", vec![2, 2]),
    ] {
        let mut file = SourceFile::new(path);
        file.imports.push(ImportStatement {
            specifier: specifier.to_string(),
            bindings: vec![ImportBinding::named("clamp")],
            line: 1,
        });
        file.occurrences = lines.into_iter().map(|l| occurrence("clamp", l)).collect();
        files.insert(file);
    }
    // Byte order puts "a-b.ts" before "a/b.ts"; component order would not.
    let index = UsageIndex::build(&files, &BarrelMatcher::empty());
    assert_eq!(
        index.usages(&EntityKey::new("/repo/lib/util.ts", "clamp")),
        &[
            UsageReference::new("/repo/a-b.ts", 9),
            UsageReference::new("/repo/a/b.ts", 2),
            UsageReference::new("/repo/z.ts", 1),
            UsageReference::new("/repo/z.ts", 3),
        ]
    );
}

#[test]
fn test_unchanged_entity_skipped_after_persisted_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = cache_path(dir.path());
    let tree = TestTree::new(branch(
        "function",
        vec![leaf("function"), leaf("f"), leaf("("), leaf(")"), leaf("{"), leaf("}")],
    ));
    let hashes = hash_pair(&tree.root(), "function f()", None);
    let key = EntityKey::new(dir.path().join("f.ts"), "f").cache_key(dir.path());
    assert_eq!(key, "f.ts:f");

    let mut first = AnalysisCache::load(&path);
    assert!(first.needs_regeneration(&key, &hashes, 0.85));
    first.update(&key, hashes.clone(), None);
    first.save(&path).unwrap();

    let second = AnalysisCache::load(&path);
    let again = hash_pair(&tree.root(), "function f()", None);
    assert!(!second.needs_regeneration(&key, &again, 0.85));
}

#[test]
fn test_within_import_declaration() {
    let tree = TestTree::new(branch(
        "program",
        vec![
            branch(
                "import_declaration",
                vec![
                    leaf("import"),
                    branch("clause", vec![leaf("Button")]),
                    leaf("from"),
                    leaf("'./Button'"),
                ],
            ),
            branch("call", vec![leaf("render"), leaf("("), leaf("Widget"), leaf(")")]),
        ],
    ));

    assert!(tree.find_leaf("Button").unwrap().within_import_declaration());
    assert!(!tree.find_leaf("Widget").unwrap().within_import_declaration());
    assert!(!tree.root().within_import_declaration());
}

#[test]
fn test_file_set_reinsert_keeps_id() {
    let mut files = FileSet::new();
    let a = files.insert(SourceFile::new("/repo/a.ts"));
    let b = files.insert(SourceFile::new("/repo/b.ts"));
    let mut updated = SourceFile::new("/repo/a.ts");
    updated.default_export = Some("A".to_string());

    assert_eq!(files.insert(updated), a);
    assert_ne!(a, b);
    assert_eq!(files.len(), 2);
    assert_eq!(files.get(a).unwrap().default_export.as_deref(), Some("A"));
}
