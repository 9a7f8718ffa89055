//! Extraction shared by the TypeScript, TSX and JavaScript grammars
//!
//! The three tree-sitter grammars agree on the node kinds used here; the
//! TypeScript-only kinds (interfaces, type aliases, annotations) simply never
//! appear in JavaScript trees.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tendril_core::{
    CatalogEntry, EntityKey, EntityKind, ImportBinding, ImportStatement, Occurrence, SourceFile,
    SyntaxNode, hash_pair,
};

use crate::extractor::{ExtractionResult, IndexError};
use crate::node::TsNode;
use crate::parser::{self, FileType};
use crate::signature::{render, render_tokens, tokens};

/// Node kinds recorded in the occurrence stream.
const OCCURRENCE_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "shorthand_property_identifier",
];

/// Parse `content` and extract the file view and its exported entities.
pub fn extract(
    path: &Path,
    content: &str,
    file_type: FileType,
) -> Result<ExtractionResult, IndexError> {
    let tree = parser::parse(file_type, content).map_err(|source| IndexError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if tree.root_node().has_error() {
        tracing::debug!("{}: recovered from syntax errors", path.display());
    }
    let root = TsNode::new(tree.root_node(), content);

    let exports = collect_exports(root);
    let type_decls = type_declarations(root);

    let mut seen = HashSet::new();
    let entities = exports
        .decls
        .iter()
        .filter(|decl| seen.insert(decl.name.clone()))
        .map(|decl| catalog_entry(path, decl, &type_decls))
        .collect();

    let source = SourceFile {
        path: path.to_path_buf(),
        imports: collect_imports(root),
        occurrences: collect_occurrences(root),
        default_export: exports.default_name,
    };

    Ok(ExtractionResult { source, entities })
}

fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`').to_string()
}

fn collect_imports(root: TsNode<'_>) -> Vec<ImportStatement> {
    root.named_children()
        .into_iter()
        .filter(|node| node.kind() == "import_statement")
        .filter_map(|stmt| {
            let specifier = unquote(stmt.field("source")?.text());
            let mut bindings = Vec::new();

            if let Some(clause) = stmt.child_of_kind("import_clause") {
                for part in clause.named_children() {
                    match part.kind() {
                        "identifier" => bindings.push(ImportBinding::default_import(part.text())),
                        "named_imports" => {
                            for spec in part.named_children() {
                                if spec.kind() != "import_specifier" {
                                    continue;
                                }
                                let Some(name) = spec.field("name") else {
                                    continue;
                                };
                                let name = unquote(name.text());
                                bindings.push(match spec.field("alias") {
                                    Some(alias) => ImportBinding::aliased(name, alias.text()),
                                    None => ImportBinding::named(name),
                                });
                            }
                        }
                        // `* as ns` binds no tracked name
                        _ => {}
                    }
                }
            }

            Some(ImportStatement {
                specifier,
                bindings,
                line: stmt.line(),
            })
        })
        .collect()
}

fn collect_occurrences(root: TsNode<'_>) -> Vec<Occurrence> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_trivia() {
            continue;
        }
        if OCCURRENCE_KINDS.contains(&node.kind()) {
            out.push(Occurrence {
                text: node.text().to_string(),
                line: node.line(),
                in_import: node.within_import_declaration(),
            });
            continue;
        }
        stack.extend(node.children().into_iter().rev());
    }
    out
}

#[derive(Clone)]
struct Decl<'a> {
    name: String,
    kind: EntityKind,
    node: TsNode<'a>,
}

struct Exports<'a> {
    decls: Vec<Decl<'a>>,
    default_name: Option<String>,
}

fn collect_exports<'a>(root: TsNode<'a>) -> Exports<'a> {
    let mut exports = Exports {
        decls: Vec::new(),
        default_name: None,
    };
    let mut locals: HashMap<String, Decl<'a>> = HashMap::new();
    // (local name, exported-as) from `export { ... }` clauses
    let mut pending: Vec<(String, Option<String>)> = Vec::new();

    for stmt in root.named_children() {
        if stmt.kind() != "export_statement" {
            for decl in declarations_of(stmt) {
                locals.entry(decl.name.clone()).or_insert(decl);
            }
            continue;
        }
        // `export ... from '...'` defines nothing here
        if stmt.field("source").is_some() {
            continue;
        }
        let is_default = stmt.has_child_kind("default");

        if let Some(declaration) = stmt.field("declaration") {
            for decl in declarations_of(declaration) {
                if is_default && exports.default_name.is_none() {
                    exports.default_name = Some(decl.name.clone());
                }
                exports.decls.push(decl);
            }
        } else if let Some(value) = stmt.field("value").filter(|_| is_default) {
            if value.kind() == "identifier" {
                let name = value.text().to_string();
                exports.default_name = Some(name.clone());
                pending.push((name, None));
            } else if let Some(decl) = named_expression(value) {
                exports.default_name = Some(decl.name.clone());
                exports.decls.push(decl);
            } else {
                tracing::debug!("Skipping anonymous default export at line {}", stmt.line());
            }
        } else if let Some(clause) = stmt.child_of_kind("export_clause") {
            for spec in clause.named_children() {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let Some(name) = spec.field("name") else {
                    continue;
                };
                let alias = spec.field("alias").map(|a| unquote(a.text()));
                pending.push((unquote(name.text()), alias));
            }
        }
    }

    for (local, alias) in pending {
        let Some(decl) = locals.get(&local) else {
            continue;
        };
        match alias.as_deref() {
            Some("default") => {
                exports.default_name.get_or_insert_with(|| local.clone());
                exports.decls.push(decl.clone());
            }
            Some(alias) => exports.decls.push(Decl {
                name: alias.to_string(),
                ..decl.clone()
            }),
            None => exports.decls.push(decl.clone()),
        }
    }

    exports
}

/// Named declarations introduced by a statement node.
fn declarations_of<'a>(node: TsNode<'a>) -> Vec<Decl<'a>> {
    let kind = match node.kind() {
        "function_declaration" | "generator_function_declaration" => EntityKind::Function,
        "class_declaration" | "abstract_class_declaration" => EntityKind::Class,
        "interface_declaration" => EntityKind::Interface,
        "type_alias_declaration" => EntityKind::TypeAlias,
        "enum_declaration" => EntityKind::Enum,
        "lexical_declaration" | "variable_declaration" => {
            return node
                .named_children()
                .into_iter()
                .filter(|child| child.kind() == "variable_declarator")
                .filter_map(|declarator| {
                    let name = declarator.field("name").filter(|n| n.kind() == "identifier")?;
                    let kind = if callable_value(declarator).is_some() {
                        EntityKind::Function
                    } else {
                        EntityKind::Variable
                    };
                    Some(Decl {
                        name: name.text().to_string(),
                        kind,
                        node: declarator,
                    })
                })
                .collect();
        }
        _ => return Vec::new(),
    };

    node.field("name")
        .map(|name| {
            vec![Decl {
                name: name.text().to_string(),
                kind,
                node,
            }]
        })
        .unwrap_or_default()
}

/// `export default function Name() {}` / `export default class Name {}`
/// when the grammar parses them as expressions.
fn named_expression<'a>(value: TsNode<'a>) -> Option<Decl<'a>> {
    let kind = match value.kind() {
        "function_expression" | "function" | "generator_function" => EntityKind::Function,
        "class" => EntityKind::Class,
        _ => return None,
    };
    let name = value.field("name")?;
    Some(Decl {
        name: name.text().to_string(),
        kind,
        node: value,
    })
}

fn callable_value<'a>(declarator: TsNode<'a>) -> Option<TsNode<'a>> {
    declarator.field("value").filter(|value| {
        matches!(
            value.kind(),
            "arrow_function" | "function_expression" | "function" | "generator_function"
        )
    })
}

/// Top-level interfaces and type aliases by name, exported or not.
fn type_declarations<'a>(root: TsNode<'a>) -> HashMap<String, TsNode<'a>> {
    let mut out = HashMap::new();
    for stmt in root.named_children() {
        let node = if stmt.kind() == "export_statement" {
            match stmt.field("declaration") {
                Some(declaration) => declaration,
                None => continue,
            }
        } else {
            stmt
        };
        if matches!(node.kind(), "interface_declaration" | "type_alias_declaration") {
            if let Some(name) = node.field("name") {
                out.entry(name.text().to_string()).or_insert(node);
            }
        }
    }
    out
}

fn catalog_entry(
    path: &Path,
    decl: &Decl<'_>,
    type_decls: &HashMap<String, TsNode<'_>>,
) -> CatalogEntry {
    let (signature, type_node) = describe(decl, type_decls);
    let hashes = hash_pair(&decl.node, &signature, type_node.as_ref());
    CatalogEntry {
        key: EntityKey::new(path, decl.name.clone()),
        kind: decl.kind,
        line: decl.node.line(),
        signature,
        hashes,
    }
}

/// Rendered signature and the type/props node feeding the interface hash.
fn describe<'a>(
    decl: &Decl<'a>,
    type_decls: &HashMap<String, TsNode<'a>>,
) -> (String, Option<TsNode<'a>>) {
    let node = decl.node;
    let name = decl.name.as_str();

    match node.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "function_expression"
        | "function"
        | "generator_function" => (
            format!("function {name}{}", callable_shape(node)),
            props_type(node, type_decls),
        ),
        "class_declaration" | "abstract_class_declaration" | "class" => {
            (class_signature(name, node), None)
        }
        "interface_declaration" => {
            let mut head = vec!["interface".to_string(), name.to_string()];
            extend_with(&mut head, node.field("type_parameters"));
            extend_with(&mut head, node.child_of_kind("extends_type_clause"));
            (render_tokens(&head), node.field("body"))
        }
        "type_alias_declaration" => (
            format!("type {name}{}", render(node.field("type_parameters"))),
            node.field("value"),
        ),
        "enum_declaration" => (format!("enum {name}"), node.field("body")),
        "variable_declarator" => variable_signature(name, node, type_decls),
        _ => (name.to_string(), None),
    }
}

fn extend_with(out: &mut Vec<String>, node: Option<TsNode<'_>>) {
    if let Some(node) = node {
        out.extend(tokens(&node));
    }
}

/// `<T>(params): Ret` of a function-like node.
fn callable_shape(func: TsNode<'_>) -> String {
    let mut toks = Vec::new();
    for field in ["type_parameters", "parameters", "parameter", "return_type"] {
        extend_with(&mut toks, func.field(field));
    }
    render_tokens(&toks)
}

/// Type of the first parameter, swapped for its declaration when that is
/// an interface or type alias in the same file.
fn props_type<'a>(
    func: TsNode<'a>,
    type_decls: &HashMap<String, TsNode<'a>>,
) -> Option<TsNode<'a>> {
    let params = func.field("parameters")?;
    let first = params
        .named_children()
        .into_iter()
        .find(|p| matches!(p.kind(), "required_parameter" | "optional_parameter"))?;
    let annotation = first.field("type")?;
    let ty = annotation.named_children().into_iter().find(|n| !n.is_trivia())?;
    if ty.kind() == "type_identifier" {
        if let Some(decl) = type_decls.get(ty.text()) {
            return Some(*decl);
        }
    }
    Some(annotation)
}

fn variable_signature<'a>(
    name: &str,
    declarator: TsNode<'a>,
    type_decls: &HashMap<String, TsNode<'a>>,
) -> (String, Option<TsNode<'a>>) {
    let keyword = declarator
        .parent()
        .and_then(|stmt| stmt.children().into_iter().next())
        .map(|kw| kw.text().to_string())
        .unwrap_or_else(|| "const".to_string());
    let annotation = declarator.field("type");
    let annotated = render(annotation);

    match callable_value(declarator) {
        Some(func) if func.kind() == "arrow_function" => (
            format!("{keyword} {name}{annotated} = {} =>", callable_shape(func)),
            props_type(func, type_decls).or(annotation),
        ),
        Some(func) => (
            format!("{keyword} {name}{annotated} = function{}", callable_shape(func)),
            props_type(func, type_decls).or(annotation),
        ),
        None => (format!("{keyword} {name}{annotated}"), annotation),
    }
}

const MEMBER_MODIFIERS: &[&str] = &["static", "abstract", "readonly", "async", "get", "set"];

/// `class Name<T> extends B implements I { member; member }` listing the
/// public members only.
fn class_signature(name: &str, class: TsNode<'_>) -> String {
    let mut head = Vec::new();
    if class.kind() == "abstract_class_declaration" {
        head.push("abstract".to_string());
    }
    head.push("class".to_string());
    head.push(name.to_string());
    extend_with(&mut head, class.field("type_parameters"));
    extend_with(&mut head, class.child_of_kind("class_heritage"));

    let members: Vec<String> = class
        .field("body")
        .map(|body| body.named_children().into_iter().filter_map(member_signature).collect())
        .unwrap_or_default();

    let mut signature = render_tokens(&head);
    if !members.is_empty() {
        signature.push_str(" { ");
        signature.push_str(&members.join("; "));
        signature.push_str(" }");
    }
    signature
}

fn member_signature(member: TsNode<'_>) -> Option<String> {
    let is_method = match member.kind() {
        "method_definition" | "method_signature" | "abstract_method_signature" => true,
        "public_field_definition" | "field_definition" => false,
        _ => return None,
    };
    let children = member.children();
    if children
        .iter()
        .any(|c| c.kind() == "accessibility_modifier" && c.text() != "public")
    {
        return None;
    }
    let name = member.field("name").or_else(|| member.field("property"))?;
    if name.kind() == "private_property_identifier" {
        return None;
    }

    let mut toks: Vec<String> = children
        .iter()
        .filter(|c| MEMBER_MODIFIERS.contains(&c.kind()))
        .map(|c| c.text().to_string())
        .collect();
    toks.push(name.text().to_string());

    if is_method {
        for field in ["type_parameters", "parameters", "return_type"] {
            extend_with(&mut toks, member.field(field));
        }
    } else {
        if member.has_child_kind("?") {
            toks.push("?".to_string());
        }
        extend_with(&mut toks, member.field("type"));
    }
    Some(render_tokens(&toks))
}
