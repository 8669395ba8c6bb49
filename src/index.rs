//! The root crate-boundary type (`SemanticIndex`) and the `index_file`
//! entry point that produces one: parse, compile the language's capture
//! query (once per process, per §D), run it, and hand the resulting
//! captures to `semindex_core::indexer::index`.

use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

use semindex_core::definition::{
    Class, Enum, Function, Import, Interface, Namespace, SymbolName, TypeAlias, Variable,
};
use semindex_core::{node_to_location, Capture, DiagnosticSink, Location, Scope, ScopeId, SymbolId};

use crate::error::{RootError, RootResult};
use crate::language::Language;

/// Placeholder element type for `SemanticIndex::references`. The
/// reference-extraction pipeline that would populate this is a parallel
/// concern with its own adapter surface and is out of scope here (spec.md
/// §1, §F); the field always holds an empty vec, and this type exists only
/// so the shape of `SemanticIndex` matches spec.md §6 exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolReference {
    pub from: SymbolId,
    pub to: SymbolId,
    pub location: Location,
}

/// The frozen, serializable catalogue of one file's definitions and scopes
/// (spec.md §6). Every map is keyed by `SymbolId`; `symbols_by_name` is the
/// inverted index spec.md §6 describes as built "by iterating every
/// top-level map once and appending `symbol_id` to the list under `name`" —
/// `BuilderResult::name_index_entries` is the core crate's concrete
/// implementation of that iteration, including free-standing decorator
/// records alongside the eight maps this struct exposes directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticIndex {
    pub file_path: String,
    pub language: Language,
    pub root_scope_id: ScopeId,
    pub scopes: IndexMap<ScopeId, Scope>,

    pub functions: IndexMap<SymbolId, Function>,
    pub classes: IndexMap<SymbolId, Class>,
    pub variables: IndexMap<SymbolId, Variable>,
    pub interfaces: IndexMap<SymbolId, Interface>,
    pub enums: IndexMap<SymbolId, Enum>,
    pub namespaces: IndexMap<SymbolId, Namespace>,
    pub type_aliases: IndexMap<SymbolId, TypeAlias>,
    pub imports: IndexMap<SymbolId, Import>,

    pub references: Vec<SymbolReference>,
    pub symbols_by_name: IndexMap<SymbolName, Vec<SymbolId>>,
}

impl SemanticIndex {
    fn from_outcome(
        file_path: String,
        language: Language,
        outcome: semindex_core::IndexOutcome,
    ) -> SemanticIndex {
        let mut symbols_by_name: IndexMap<SymbolName, Vec<SymbolId>> = IndexMap::new();
        for (id, name) in outcome.result.name_index_entries() {
            symbols_by_name.entry(name.to_string()).or_default().push(id.clone());
        }

        let root_scope_id = outcome.scopes.root_scope();
        let scopes = outcome
            .scopes
            .iter()
            .map(|scope| (scope.id, scope.clone()))
            .collect();

        SemanticIndex {
            file_path,
            language,
            root_scope_id,
            scopes,
            functions: outcome.result.functions,
            classes: outcome.result.classes,
            variables: outcome.result.variables,
            interfaces: outcome.result.interfaces,
            enums: outcome.result.enums,
            namespaces: outcome.result.namespaces,
            type_aliases: outcome.result.type_aliases,
            imports: outcome.result.imports,
            references: Vec::new(),
            symbols_by_name,
        }
    }
}

/// One compiled `Query` per `Language` variant, cached for the process'
/// lifetime: compiling a tree-sitter query is not free, and a query only
/// ever depends on the adapter's `.scm` source and the grammar it targets,
/// neither of which vary across calls (§D).
struct QueryCache {
    javascript: OnceLock<Query>,
    typescript: OnceLock<Query>,
    tsx: OnceLock<Query>,
    python: OnceLock<Query>,
    rust: OnceLock<Query>,
}

static QUERY_CACHE: QueryCache = QueryCache {
    javascript: OnceLock::new(),
    typescript: OnceLock::new(),
    tsx: OnceLock::new(),
    python: OnceLock::new(),
    rust: OnceLock::new(),
};

fn compiled_query(language: Language) -> RootResult<&'static Query> {
    let cell = match language {
        Language::JavaScript => &QUERY_CACHE.javascript,
        Language::TypeScript => &QUERY_CACHE.typescript,
        Language::Tsx => &QUERY_CACHE.tsx,
        Language::Python => &QUERY_CACHE.python,
        Language::Rust => &QUERY_CACHE.rust,
    };
    if let Some(query) = cell.get() {
        return Ok(query);
    }
    let query = Query::new(&language.grammar(), language.query_source()).map_err(|source| {
        RootError::QueryCompilation {
            language,
            source,
        }
    })?;
    Ok(cell.get_or_init(|| query))
}

/// Parse `source` as `language`, run its capture query, and build the
/// resulting `SemanticIndex`. Returns the soft-error diagnostic stream
/// alongside the index, per SPEC_FULL.md §E (spec.md §7 describes this
/// stream as "a sidecar to `BuilderResult`, not part of it").
pub fn index_file(
    file_path: &str,
    source: &str,
    language: Language,
) -> RootResult<(SemanticIndex, DiagnosticSink)> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.grammar())
        .expect("grammar() returns a grammar built for this tree-sitter version");
    let tree = parser.parse(source, None).ok_or_else(|| RootError::ParseFailed {
        file_path: file_path.to_string(),
    })?;

    let query = compiled_query(language)?;
    let capture_names = query.capture_names();

    let mut captures = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());
    while let Some(m) = matches.next() {
        for qc in m.captures {
            let node = qc.node;
            let name = capture_names[qc.index as usize].to_string();
            let text = node.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
            let location = node_to_location(&node, file_path);
            captures.push(Capture {
                name,
                node,
                text,
                location,
            });
        }
    }

    let adapter = language.adapter();
    let outcome = semindex_core::indexer::index(adapter.as_ref(), captures, file_path, source)?;
    let diagnostics = outcome.diagnostics.clone();
    let index = SemanticIndex::from_outcome(file_path.to_string(), language, outcome);
    Ok((index, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_a_plain_typescript_class() {
        let source = "export class Point {\n  x: number;\n  constructor(x: number) { this.x = x; }\n}\n";
        let (index, _diagnostics) = index_file("point.ts", source, Language::TypeScript).unwrap();
        assert_eq!(index.classes.len(), 1);
        let class = index.classes.values().next().unwrap();
        assert!(class.header.is_exported);
        assert!(index.symbols_by_name.contains_key("Point"));
    }

    #[test]
    fn indexes_a_plain_javascript_function_against_the_typescript_grammar() {
        let source = "function add(a, b) {\n  return a + b;\n}\n";
        let (index, _diagnostics) = index_file("add.js", source, Language::JavaScript).unwrap();
        assert_eq!(index.functions.len(), 1);
        assert_eq!(index.functions.values().next().unwrap().header.name, "add");
    }

    #[test]
    fn indexes_a_python_class_with_a_method() {
        let source = "class Greeter:\n    def __init__(self, name):\n        self.name = name\n\n    def greet(self):\n        return self.name\n";
        let (index, _diagnostics) = index_file("greeter.py", source, Language::Python).unwrap();
        assert_eq!(index.classes.len(), 1);
        let class = index.classes.values().next().unwrap();
        assert_eq!(class.constructors.len(), 1);
        assert_eq!(class.methods.len(), 1);
    }

    #[test]
    fn indexes_a_rust_struct_with_an_impl_method() {
        let source = "pub struct Point { pub x: i32 }\n\nimpl Point {\n    pub fn x(&self) -> i32 { self.x }\n}\n";
        let (index, _diagnostics) = index_file("point.rs", source, Language::Rust).unwrap();
        assert_eq!(index.classes.len(), 1);
        assert_eq!(index.functions.len(), 0);
    }

    #[test]
    fn symbols_by_name_covers_every_top_level_definition() {
        let source = "export function helper() {}\nfunction helper() {}\n";
        let (index, _diagnostics) = index_file("dup.ts", source, Language::TypeScript).unwrap();
        assert_eq!(index.symbols_by_name["helper"].len(), 2);
    }

    #[test]
    fn unparseable_language_grammar_never_panics_on_empty_source() {
        let (index, _diagnostics) = index_file("empty.rs", "", Language::Rust).unwrap();
        assert!(index.functions.is_empty());
    }
}
